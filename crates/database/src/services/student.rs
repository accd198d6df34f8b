use crate::{
    ServiceError,
    entities::{
        certificate, completed_lesson, course, enrolled_course, note, notification,
        question_answer, question_answer_message, review, teacher, user, variant, variant_item,
        wishlist,
    },
    services::{CatalogService, Curriculum, now},
};
use futures::try_join;
use log::info;
use models::{codes, status::NotificationType};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    TransactionTrait, sea_query::JoinType,
};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StudentSummary {
    pub total_courses: u64,
    pub completed_lessons: u64,
    pub achieved_certificates: u64,
}

/// A Q&A thread with its messages, oldest first
#[derive(Debug, Clone, Serialize)]
pub struct QuestionThread {
    #[serde(flatten)]
    pub question: question_answer::Model,
    pub messages: Vec<question_answer_message::Model>,
}

/// Everything the student sees inside one enrolled course
#[derive(Debug, Clone)]
pub struct EnrollmentDetail {
    pub enrollment: enrolled_course::Model,
    pub course: course::Model,
    pub curriculum: Curriculum,
    pub completed_lessons: Vec<completed_lesson::Model>,
    pub notes: Vec<note::Model>,
    pub questions: Vec<QuestionThread>,
    pub review: Option<review::Model>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LessonToggle {
    Completed(completed_lesson::Model),
    Uncompleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishlistToggle {
    Added,
    Removed,
}

pub struct StudentService;

impl StudentService {
    pub async fn summary(db: &DatabaseConnection, user_id: i32) -> Result<StudentSummary, DbErr> {
        let (total_courses, completed_lessons, achieved_certificates) = try_join!(
            enrolled_course::Entity::find()
                .filter(enrolled_course::Column::UserId.eq(user_id))
                .count(db),
            completed_lesson::Entity::find()
                .filter(completed_lesson::Column::UserId.eq(user_id))
                .count(db),
            certificate::Entity::find()
                .filter(certificate::Column::UserId.eq(user_id))
                .count(db),
        )?;

        Ok(StudentSummary {
            total_courses,
            completed_lessons,
            achieved_certificates,
        })
    }

    pub async fn enrolled_courses(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<Vec<(enrolled_course::Model, Option<course::Model>)>, DbErr> {
        enrolled_course::Entity::find()
            .filter(enrolled_course::Column::UserId.eq(user_id))
            .order_by_desc(enrolled_course::Column::CreatedAt)
            .order_by_desc(enrolled_course::Column::Id)
            .find_also_related(course::Entity)
            .all(db)
            .await
    }

    /// The student's enrollment with the given public id
    async fn enrollment<C: ConnectionTrait>(
        db: &C,
        user_id: i32,
        enrollment_id: &str,
    ) -> Result<enrolled_course::Model, ServiceError> {
        enrolled_course::Entity::find()
            .filter(enrolled_course::Column::UserId.eq(user_id))
            .filter(enrolled_course::Column::EnrollmentId.eq(enrollment_id))
            .one(db)
            .await?
            .ok_or(ServiceError::NotEnrolled)
    }

    /// Fails with `NotEnrolled` unless the user bought the course
    pub async fn require_enrollment<C: ConnectionTrait>(
        db: &C,
        user_id: i32,
        course_id: i32,
    ) -> Result<enrolled_course::Model, ServiceError> {
        enrolled_course::Entity::find()
            .filter(enrolled_course::Column::UserId.eq(user_id))
            .filter(enrolled_course::Column::CourseId.eq(course_id))
            .one(db)
            .await?
            .ok_or(ServiceError::NotEnrolled)
    }

    pub async fn enrolled_course_detail(
        db: &DatabaseConnection,
        user_id: i32,
        enrollment_id: &str,
    ) -> Result<EnrollmentDetail, ServiceError> {
        let enrollment = Self::enrollment(db, user_id, enrollment_id).await?;
        let course = course::Entity::find_by_id(enrollment.course_id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("course"))?;

        let curriculum = CatalogService::curriculum(db, course.id).await?;
        let completed_lessons = completed_lesson::Entity::find()
            .filter(completed_lesson::Column::UserId.eq(user_id))
            .filter(completed_lesson::Column::CourseId.eq(course.id))
            .all(db)
            .await?;
        let notes = note::Entity::find()
            .filter(note::Column::UserId.eq(user_id))
            .filter(note::Column::CourseId.eq(course.id))
            .order_by_desc(note::Column::Id)
            .all(db)
            .await?;
        let questions = Self::questions(db, course.id).await?;
        let review = review::Entity::find()
            .filter(review::Column::UserId.eq(user_id))
            .filter(review::Column::CourseId.eq(course.id))
            .one(db)
            .await?;

        Ok(EnrollmentDetail {
            enrollment,
            course,
            curriculum,
            completed_lessons,
            notes,
            questions,
            review,
        })
    }

    /// Mark a lecture done, or undo it when it already is
    pub async fn toggle_lesson(
        db: &DatabaseConnection,
        user_id: i32,
        course_id: i32,
        variant_item_code: &str,
    ) -> Result<LessonToggle, ServiceError> {
        Self::require_enrollment(db, user_id, course_id).await?;

        let item = variant_item::Entity::find()
            .join(JoinType::InnerJoin, variant_item::Relation::Variant.def())
            .filter(variant_item::Column::Code.eq(variant_item_code))
            .filter(variant::Column::CourseId.eq(course_id))
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("lesson"))?;

        let existing = completed_lesson::Entity::find()
            .filter(completed_lesson::Column::UserId.eq(user_id))
            .filter(completed_lesson::Column::VariantItemId.eq(item.id))
            .one(db)
            .await?;

        match existing {
            Some(done) => {
                done.delete(db).await?;
                Ok(LessonToggle::Uncompleted)
            }
            None => {
                let done = completed_lesson::ActiveModel {
                    course_id: Set(course_id),
                    user_id: Set(user_id),
                    variant_item_id: Set(item.id),
                    created_at: Set(now()),
                    ..Default::default()
                }
                .insert(db)
                .await?;
                issue_certificate(db, user_id, course_id).await?;
                Ok(LessonToggle::Completed(done))
            }
        }
    }

    pub async fn list_notes(
        db: &DatabaseConnection,
        user_id: i32,
        enrollment_id: &str,
    ) -> Result<Vec<note::Model>, ServiceError> {
        let enrollment = Self::enrollment(db, user_id, enrollment_id).await?;

        Ok(note::Entity::find()
            .filter(note::Column::UserId.eq(user_id))
            .filter(note::Column::CourseId.eq(enrollment.course_id))
            .order_by_desc(note::Column::Id)
            .all(db)
            .await?)
    }

    pub async fn create_note(
        db: &DatabaseConnection,
        user_id: i32,
        enrollment_id: &str,
        title: Option<String>,
        body: String,
    ) -> Result<note::Model, ServiceError> {
        let enrollment = Self::enrollment(db, user_id, enrollment_id).await?;

        Ok(note::ActiveModel {
            code: Set(codes::note_code()),
            user_id: Set(user_id),
            course_id: Set(enrollment.course_id),
            title: Set(title),
            note: Set(body),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(db)
        .await?)
    }

    pub async fn get_note(
        db: &DatabaseConnection,
        user_id: i32,
        enrollment_id: &str,
        note_code: &str,
    ) -> Result<note::Model, ServiceError> {
        let enrollment = Self::enrollment(db, user_id, enrollment_id).await?;

        note::Entity::find()
            .filter(note::Column::UserId.eq(user_id))
            .filter(note::Column::CourseId.eq(enrollment.course_id))
            .filter(note::Column::Code.eq(note_code))
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("note"))
    }

    pub async fn update_note(
        db: &DatabaseConnection,
        user_id: i32,
        enrollment_id: &str,
        note_code: &str,
        title: Option<String>,
        body: String,
    ) -> Result<note::Model, ServiceError> {
        let found = Self::get_note(db, user_id, enrollment_id, note_code).await?;

        let mut active: note::ActiveModel = found.into();
        active.title = Set(title);
        active.note = Set(body);
        Ok(active.update(db).await?)
    }

    pub async fn delete_note(
        db: &DatabaseConnection,
        user_id: i32,
        enrollment_id: &str,
        note_code: &str,
    ) -> Result<(), ServiceError> {
        let found = Self::get_note(db, user_id, enrollment_id, note_code).await?;
        found.delete(db).await?;
        Ok(())
    }

    /// Leave a review; buying the course is not required
    pub async fn rate_course(
        db: &DatabaseConnection,
        user_id: i32,
        course_id: i32,
        rating: i32,
        text: String,
    ) -> Result<review::Model, ServiceError> {
        validate_rating(rating)?;

        if user::Entity::find_by_id(user_id).one(db).await?.is_none() {
            return Err(ServiceError::NotFound("user"));
        }
        let course = course::Entity::find_by_id(course_id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("course"))?;

        let txn = db.begin().await?;

        let review = review::ActiveModel {
            user_id: Set(Some(user_id)),
            course_id: Set(course.id),
            review: Set(text),
            rating: Set(rating),
            active: Set(true),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        notification::ActiveModel {
            teacher_id: Set(Some(course.teacher_id)),
            review_id: Set(Some(review.id)),
            kind: Set(NotificationType::NewReview),
            seen: Set(false),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!("User {user_id} rated course {} with {rating}", course.id);
        Ok(review)
    }

    pub async fn update_review(
        db: &DatabaseConnection,
        user_id: i32,
        review_id: i32,
        rating: i32,
        text: String,
    ) -> Result<review::Model, ServiceError> {
        validate_rating(rating)?;

        let found = review::Entity::find_by_id(review_id)
            .filter(review::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("review"))?;

        let mut active: review::ActiveModel = found.into();
        active.rating = Set(rating);
        active.review = Set(text);
        Ok(active.update(db).await?)
    }

    pub async fn toggle_wishlist(
        db: &DatabaseConnection,
        user_id: i32,
        course_id: i32,
    ) -> Result<WishlistToggle, ServiceError> {
        if course::Entity::find_by_id(course_id).one(db).await?.is_none() {
            return Err(ServiceError::NotFound("course"));
        }

        let existing = wishlist::Entity::find()
            .filter(wishlist::Column::UserId.eq(user_id))
            .filter(wishlist::Column::CourseId.eq(course_id))
            .one(db)
            .await?;

        match existing {
            Some(entry) => {
                entry.delete(db).await?;
                Ok(WishlistToggle::Removed)
            }
            None => {
                wishlist::ActiveModel {
                    user_id: Set(user_id),
                    course_id: Set(course_id),
                    ..Default::default()
                }
                .insert(db)
                .await?;
                Ok(WishlistToggle::Added)
            }
        }
    }

    pub async fn wishlist(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<Vec<(wishlist::Model, Option<course::Model>)>, DbErr> {
        wishlist::Entity::find()
            .filter(wishlist::Column::UserId.eq(user_id))
            .order_by_asc(wishlist::Column::Id)
            .find_also_related(course::Entity)
            .all(db)
            .await
    }

    /// All Q&A threads of a course, newest first
    pub async fn questions<C: ConnectionTrait>(
        db: &C,
        course_id: i32,
    ) -> Result<Vec<QuestionThread>, DbErr> {
        let questions = question_answer::Entity::find()
            .filter(question_answer::Column::CourseId.eq(course_id))
            .order_by_desc(question_answer::Column::Id)
            .all(db)
            .await?;

        load_threads(db, questions).await
    }

    /// Open a thread with its first message
    pub async fn ask_question(
        db: &DatabaseConnection,
        course_id: i32,
        user_id: i32,
        title: String,
        message: String,
    ) -> Result<QuestionThread, ServiceError> {
        let course = Self::participant_course(db, course_id, user_id).await?;

        let txn = db.begin().await?;

        let question = question_answer::ActiveModel {
            qa_id: Set(codes::question_code()),
            course_id: Set(course.id),
            user_id: Set(Some(user_id)),
            title: Set(Some(title)),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let first = question_answer_message::ActiveModel {
            qam_id: Set(codes::message_code()),
            course_id: Set(course.id),
            user_id: Set(Some(user_id)),
            question_id: Set(question.id),
            message: Set(message),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        notification::ActiveModel {
            teacher_id: Set(Some(course.teacher_id)),
            kind: Set(NotificationType::NewCourseQuestion),
            seen: Set(false),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        Ok(QuestionThread {
            question,
            messages: vec![first],
        })
    }

    /// Reply inside an existing thread and return the updated thread
    pub async fn send_message(
        db: &DatabaseConnection,
        course_id: i32,
        qa_id: &str,
        user_id: i32,
        message: String,
    ) -> Result<QuestionThread, ServiceError> {
        let course = Self::participant_course(db, course_id, user_id).await?;

        let question = question_answer::Entity::find()
            .filter(question_answer::Column::QaId.eq(qa_id))
            .filter(question_answer::Column::CourseId.eq(course.id))
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("question"))?;

        question_answer_message::ActiveModel {
            qam_id: Set(codes::message_code()),
            course_id: Set(course.id),
            user_id: Set(Some(user_id)),
            question_id: Set(question.id),
            message: Set(message),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        let messages = question
            .find_related(question_answer_message::Entity)
            .order_by_asc(question_answer_message::Column::Id)
            .all(db)
            .await?;

        Ok(QuestionThread { question, messages })
    }

    /// Q&A is open to enrolled students and to the course's own teacher
    async fn participant_course(
        db: &DatabaseConnection,
        course_id: i32,
        user_id: i32,
    ) -> Result<course::Model, ServiceError> {
        let course = course::Entity::find_by_id(course_id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("course"))?;

        let is_teacher = teacher::Entity::find_by_id(course.teacher_id)
            .one(db)
            .await?
            .is_some_and(|t| t.user_id == user_id);

        if !is_teacher {
            Self::require_enrollment(db, user_id, course.id).await?;
        }

        Ok(course)
    }
}

fn validate_rating(rating: i32) -> Result<(), ServiceError> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(ServiceError::Validation(format!(
            "rating must be between 1 and 5, got {rating}"
        )))
    }
}

/// Attach messages to each thread, preserving thread order
pub(crate) async fn load_threads<C: ConnectionTrait>(
    db: &C,
    questions: Vec<question_answer::Model>,
) -> Result<Vec<QuestionThread>, DbErr> {
    if questions.is_empty() {
        return Ok(vec![]);
    }

    let question_ids: Vec<i32> = questions.iter().map(|q| q.id).collect();
    let messages = question_answer_message::Entity::find()
        .filter(question_answer_message::Column::QuestionId.is_in(question_ids))
        .order_by_asc(question_answer_message::Column::Id)
        .all(db)
        .await?;

    let mut by_question: HashMap<i32, Vec<question_answer_message::Model>> = HashMap::new();
    for message in messages {
        by_question
            .entry(message.question_id)
            .or_default()
            .push(message);
    }

    Ok(questions
        .into_iter()
        .map(|question| {
            let messages = by_question.remove(&question.id).unwrap_or_default();
            QuestionThread { question, messages }
        })
        .collect())
}

/// Issues a certificate once every lesson of the course is completed
async fn issue_certificate(
    db: &DatabaseConnection,
    user_id: i32,
    course_id: i32,
) -> Result<Option<certificate::Model>, DbErr> {
    let issued = certificate::Entity::find()
        .filter(certificate::Column::UserId.eq(user_id))
        .filter(certificate::Column::CourseId.eq(course_id))
        .one(db)
        .await?;
    if issued.is_some() {
        return Ok(None);
    }

    let (lessons, completed) = try_join!(
        variant_item::Entity::find()
            .join(JoinType::InnerJoin, variant_item::Relation::Variant.def())
            .filter(variant::Column::CourseId.eq(course_id))
            .count(db),
        completed_lesson::Entity::find()
            .filter(completed_lesson::Column::UserId.eq(user_id))
            .filter(completed_lesson::Column::CourseId.eq(course_id))
            .count(db),
    )?;
    if lessons == 0 || completed < lessons {
        return Ok(None);
    }

    let certificate = certificate::ActiveModel {
        certificate_id: Set(codes::certificate_code()),
        course_id: Set(course_id),
        user_id: Set(user_id),
        created_at: Set(now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        "Issued certificate {} to user {} for course {}",
        certificate.certificate_id, user_id, course_id
    );
    Ok(Some(certificate))
}
