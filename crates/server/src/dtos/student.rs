use chrono::NaiveDateTime;
use database::{
    entities::{course, enrolled_course, note, question_answer_message, wishlist},
    services::{EnrollmentDetail, QuestionThread, StudentSummary},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::catalog::{CourseResponse, ReviewResponse, VariantResponse, curriculum_response};

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentSummaryResponse {
    pub total_courses: u64,
    pub completed_lessons: u64,
    pub achieved_certificates: u64,
}

impl From<StudentSummary> for StudentSummaryResponse {
    fn from(summary: StudentSummary) -> Self {
        Self {
            total_courses: summary.total_courses,
            completed_lessons: summary.completed_lessons,
            achieved_certificates: summary.achieved_certificates,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollmentResponse {
    pub enrollment_id: String,
    pub course: Option<CourseResponse>,
    pub enrolled_at: NaiveDateTime,
}

impl EnrollmentResponse {
    pub fn new(enrollment: enrolled_course::Model, course: Option<course::Model>) -> Self {
        Self {
            enrollment_id: enrollment.enrollment_id,
            course: course.map(Into::into),
            enrolled_at: enrollment.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NoteResponse {
    pub note_id: String,
    pub title: Option<String>,
    pub note: String,
    pub created_at: NaiveDateTime,
}

impl From<note::Model> for NoteResponse {
    fn from(note: note::Model) -> Self {
        Self {
            note_id: note.code,
            title: note.title,
            note: note.note,
            created_at: note.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionMessageResponse {
    pub qam_id: String,
    pub user_id: Option<i32>,
    pub message: String,
    pub created_at: NaiveDateTime,
}

impl From<question_answer_message::Model> for QuestionMessageResponse {
    fn from(message: question_answer_message::Model) -> Self {
        Self {
            qam_id: message.qam_id,
            user_id: message.user_id,
            message: message.message,
            created_at: message.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionResponse {
    pub qa_id: String,
    pub course_id: i32,
    pub user_id: Option<i32>,
    pub title: Option<String>,
    pub created_at: NaiveDateTime,
    pub messages: Vec<QuestionMessageResponse>,
}

impl From<QuestionThread> for QuestionResponse {
    fn from(thread: QuestionThread) -> Self {
        Self {
            qa_id: thread.question.qa_id,
            course_id: thread.question.course_id,
            user_id: thread.question.user_id,
            title: thread.question.title,
            created_at: thread.question.created_at,
            messages: thread.messages.into_iter().map(Into::into).collect(),
        }
    }
}

/// The inside of one enrolled course
#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollmentDetailResponse {
    pub enrollment_id: String,
    pub course: CourseResponse,
    pub curriculum: Vec<VariantResponse>,
    /// Public ids of the lessons marked complete
    pub completed_lessons: Vec<String>,
    pub notes: Vec<NoteResponse>,
    pub questions: Vec<QuestionResponse>,
    pub review: Option<ReviewResponse>,
}

impl From<EnrollmentDetail> for EnrollmentDetailResponse {
    fn from(detail: EnrollmentDetail) -> Self {
        let completed_lessons = detail
            .completed_lessons
            .iter()
            .filter_map(|done| {
                detail
                    .curriculum
                    .iter()
                    .flat_map(|(_, items)| items)
                    .find(|item| item.id == done.variant_item_id)
                    .map(|item| item.code.clone())
            })
            .collect();

        Self {
            enrollment_id: detail.enrollment.enrollment_id,
            course: detail.course.into(),
            curriculum: curriculum_response(detail.curriculum, false),
            completed_lessons,
            notes: detail.notes.into_iter().map(Into::into).collect(),
            questions: detail.questions.into_iter().map(Into::into).collect(),
            review: detail.review.map(Into::into),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WishlistResponse {
    pub id: i32,
    pub course: Option<CourseResponse>,
}

impl WishlistResponse {
    pub fn new(entry: wishlist::Model, course: Option<course::Model>) -> Self {
        Self {
            id: entry.id,
            course: course.map(Into::into),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LessonToggleBody {
    pub course_id: i32,
    pub variant_item_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NoteBody {
    pub title: Option<String>,
    pub note: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewBody {
    pub course_id: i32,
    /// 1 to 5
    pub rating: i32,
    pub review: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewUpdateBody {
    pub rating: i32,
    pub review: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct WishlistBody {
    pub course_id: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct QuestionBody {
    pub course_id: i32,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct QuestionMessageBody {
    pub course_id: i32,
    pub message: String,
}
