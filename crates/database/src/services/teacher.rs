use crate::{
    ServiceError,
    entities::{
        cart_order, cart_order_item, coupon, course, enrolled_course, notification,
        question_answer, review, teacher, user,
    },
    services::{QuestionThread, now, student::load_threads},
};
use chrono::{Datelike, Duration};
use log::info;
use models::{money::Cents, status::PaymentStatus};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, prelude::DateTime,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TeacherSummary {
    pub total_courses: u64,
    pub total_students: u64,
    /// Sum of item prices over paid orders
    pub total_revenue: Cents,
    /// Same, restricted to the last 28 days
    pub monthly_revenue: Cents,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeacherStudent {
    pub user_id: i32,
    pub full_name: String,
    pub image: Option<String>,
    /// Country given on the order that enrolled the student
    pub country: Option<String>,
    pub enrolled_at: DateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyEarning {
    pub year: i32,
    pub month: u32,
    pub total: Cents,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BestSellingCourse {
    pub course: course::Model,
    pub sales: u64,
    pub revenue: Cents,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CouponDraft {
    pub code: String,
    /// Whole percent, 1 to 100
    pub discount: i32,
    pub active: bool,
}

impl CouponDraft {
    fn validate(&self) -> Result<(), ServiceError> {
        if self.code.trim().is_empty() {
            return Err(ServiceError::Validation("coupon code is required".to_string()));
        }
        if !(1..=100).contains(&self.discount) {
            return Err(ServiceError::Validation(format!(
                "discount must be between 1 and 100, got {}",
                self.discount
            )));
        }
        Ok(())
    }
}

pub struct TeacherService;

impl TeacherService {
    pub async fn summary(
        db: &DatabaseConnection,
        teacher_id: i32,
    ) -> Result<TeacherSummary, DbErr> {
        let total_courses = course::Entity::find()
            .filter(course::Column::TeacherId.eq(teacher_id))
            .count(db)
            .await?;

        let total_students = enrolled_course::Entity::find()
            .select_only()
            .column(enrolled_course::Column::UserId)
            .filter(enrolled_course::Column::TeacherId.eq(teacher_id))
            .into_tuple::<Option<i32>>()
            .all(db)
            .await?
            .into_iter()
            .flatten()
            .collect::<HashSet<_>>()
            .len() as u64;

        let items = Self::order_items(db, teacher_id).await?;
        let cutoff = now() - Duration::days(28);

        let total_revenue = items.iter().map(|item| item.price).sum();
        let monthly_revenue = items
            .iter()
            .filter(|item| item.created_at >= cutoff)
            .map(|item| item.price)
            .sum();

        Ok(TeacherSummary {
            total_courses,
            total_students,
            total_revenue,
            monthly_revenue,
        })
    }

    pub async fn courses(
        db: &DatabaseConnection,
        teacher_id: i32,
    ) -> Result<Vec<course::Model>, DbErr> {
        course::Entity::find()
            .filter(course::Column::TeacherId.eq(teacher_id))
            .order_by_desc(course::Column::Id)
            .all(db)
            .await
    }

    /// Items of paid orders for this teacher's courses, newest first
    pub async fn order_items(
        db: &DatabaseConnection,
        teacher_id: i32,
    ) -> Result<Vec<cart_order_item::Model>, DbErr> {
        cart_order_item::Entity::find()
            .inner_join(cart_order::Entity)
            .filter(cart_order_item::Column::TeacherId.eq(teacher_id))
            .filter(cart_order::Column::PaymentStatus.eq(PaymentStatus::Paid))
            .order_by_desc(cart_order_item::Column::Id)
            .all(db)
            .await
    }

    /// Paid item revenue per calendar month, oldest month first
    pub async fn monthly_earnings(
        db: &DatabaseConnection,
        teacher_id: i32,
    ) -> Result<Vec<MonthlyEarning>, DbErr> {
        let mut months: BTreeMap<(i32, u32), Cents> = BTreeMap::new();
        for item in Self::order_items(db, teacher_id).await? {
            let key = (item.created_at.year(), item.created_at.month());
            *months.entry(key).or_default() += item.price;
        }

        Ok(months
            .into_iter()
            .map(|((year, month), total)| MonthlyEarning { year, month, total })
            .collect())
    }

    /// Courses ranked by enrollments; revenue is enrollments times list price
    pub async fn best_selling_courses(
        db: &DatabaseConnection,
        teacher_id: i32,
    ) -> Result<Vec<BestSellingCourse>, DbErr> {
        let courses = Self::courses(db, teacher_id).await?;

        let mut ranked = Vec::with_capacity(courses.len());
        for course in courses {
            let sales = course.find_related(enrolled_course::Entity).count(db).await?;
            let revenue = course.price * sales as i64;
            ranked.push(BestSellingCourse {
                course,
                sales,
                revenue,
            });
        }

        ranked.sort_by(|a, b| b.sales.cmp(&a.sales).then(b.revenue.cmp(&a.revenue)));
        Ok(ranked)
    }

    /// Distinct enrolled students with the country of their first order
    pub async fn students(
        db: &DatabaseConnection,
        teacher_id: i32,
    ) -> Result<Vec<TeacherStudent>, DbErr> {
        let enrollments = enrolled_course::Entity::find()
            .filter(enrolled_course::Column::TeacherId.eq(teacher_id))
            .filter(enrolled_course::Column::UserId.is_not_null())
            .order_by_asc(enrolled_course::Column::Id)
            .all(db)
            .await?;

        let mut first_by_user: Vec<enrolled_course::Model> = Vec::new();
        let mut seen = HashSet::new();
        for enrollment in enrollments {
            if let Some(user_id) = enrollment.user_id
                && seen.insert(user_id)
            {
                first_by_user.push(enrollment);
            }
        }

        let user_ids: Vec<i32> = first_by_user.iter().filter_map(|e| e.user_id).collect();
        let item_ids: Vec<i32> = first_by_user.iter().filter_map(|e| e.order_item_id).collect();

        let users: HashMap<i32, user::Model> = user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let countries: HashMap<i32, Option<String>> = cart_order_item::Entity::find()
            .filter(cart_order_item::Column::Id.is_in(item_ids))
            .find_also_related(cart_order::Entity)
            .all(db)
            .await?
            .into_iter()
            .map(|(item, order)| (item.id, order.and_then(|o| o.country)))
            .collect();

        Ok(first_by_user
            .into_iter()
            .filter_map(|enrollment| {
                let user = users.get(&enrollment.user_id?)?;
                let country = enrollment
                    .order_item_id
                    .and_then(|id| countries.get(&id).cloned().flatten());
                Some(TeacherStudent {
                    user_id: user.id,
                    full_name: user.full_name.clone(),
                    image: user.image.clone(),
                    country,
                    enrolled_at: enrollment.created_at,
                })
            })
            .collect())
    }

    pub async fn reviews(
        db: &DatabaseConnection,
        teacher_id: i32,
    ) -> Result<Vec<review::Model>, DbErr> {
        review::Entity::find()
            .inner_join(course::Entity)
            .filter(course::Column::TeacherId.eq(teacher_id))
            .order_by_desc(review::Column::Id)
            .all(db)
            .await
    }

    /// Reply to a review on one of the teacher's courses, optionally toggling
    /// whether it is shown publicly
    pub async fn reply_review(
        db: &DatabaseConnection,
        teacher_id: i32,
        review_id: i32,
        reply: String,
        active: Option<bool>,
    ) -> Result<review::Model, ServiceError> {
        let found = review::Entity::find_by_id(review_id)
            .inner_join(course::Entity)
            .filter(course::Column::TeacherId.eq(teacher_id))
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("review"))?;

        let mut active_model: review::ActiveModel = found.into();
        active_model.reply = Set(Some(reply));
        if let Some(active) = active {
            active_model.active = Set(active);
        }
        Ok(active_model.update(db).await?)
    }

    pub async fn questions(
        db: &DatabaseConnection,
        teacher_id: i32,
    ) -> Result<Vec<QuestionThread>, DbErr> {
        let course_ids: Vec<i32> = Self::courses(db, teacher_id)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();

        let questions = question_answer::Entity::find()
            .filter(question_answer::Column::CourseId.is_in(course_ids))
            .order_by_desc(question_answer::Column::Id)
            .all(db)
            .await?;

        load_threads(db, questions).await
    }

    pub async fn coupons(
        db: &DatabaseConnection,
        teacher_id: i32,
    ) -> Result<Vec<coupon::Model>, DbErr> {
        coupon::Entity::find()
            .filter(coupon::Column::TeacherId.eq(teacher_id))
            .order_by_desc(coupon::Column::Id)
            .all(db)
            .await
    }

    pub async fn coupon(
        db: &DatabaseConnection,
        teacher_id: i32,
        coupon_id: i32,
    ) -> Result<coupon::Model, ServiceError> {
        coupon::Entity::find_by_id(coupon_id)
            .filter(coupon::Column::TeacherId.eq(teacher_id))
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("coupon"))
    }

    pub async fn create_coupon(
        db: &DatabaseConnection,
        teacher_id: i32,
        draft: CouponDraft,
    ) -> Result<coupon::Model, ServiceError> {
        draft.validate()?;
        if teacher::Entity::find_by_id(teacher_id).one(db).await?.is_none() {
            return Err(ServiceError::NotFound("teacher"));
        }

        let created = coupon::ActiveModel {
            teacher_id: Set(Some(teacher_id)),
            code: Set(draft.code.trim().to_string()),
            discount: Set(draft.discount),
            active: Set(draft.active),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        info!("Teacher {teacher_id} created coupon {}", created.code);
        Ok(created)
    }

    pub async fn update_coupon(
        db: &DatabaseConnection,
        teacher_id: i32,
        coupon_id: i32,
        draft: CouponDraft,
    ) -> Result<coupon::Model, ServiceError> {
        draft.validate()?;
        let found = Self::coupon(db, teacher_id, coupon_id).await?;

        let mut active: coupon::ActiveModel = found.into();
        active.code = Set(draft.code.trim().to_string());
        active.discount = Set(draft.discount);
        active.active = Set(draft.active);
        Ok(active.update(db).await?)
    }

    pub async fn delete_coupon(
        db: &DatabaseConnection,
        teacher_id: i32,
        coupon_id: i32,
    ) -> Result<(), ServiceError> {
        let found = Self::coupon(db, teacher_id, coupon_id).await?;
        found.delete(db).await?;
        Ok(())
    }

    pub async fn unseen_notifications(
        db: &DatabaseConnection,
        teacher_id: i32,
    ) -> Result<Vec<notification::Model>, DbErr> {
        notification::Entity::find()
            .filter(notification::Column::TeacherId.eq(teacher_id))
            .filter(notification::Column::Seen.eq(false))
            .order_by_desc(notification::Column::Id)
            .all(db)
            .await
    }

    async fn notification(
        db: &DatabaseConnection,
        teacher_id: i32,
        notification_id: i32,
    ) -> Result<notification::Model, ServiceError> {
        notification::Entity::find_by_id(notification_id)
            .filter(notification::Column::TeacherId.eq(teacher_id))
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("notification"))
    }

    pub async fn mark_notification_seen(
        db: &DatabaseConnection,
        teacher_id: i32,
        notification_id: i32,
    ) -> Result<notification::Model, ServiceError> {
        let found = Self::notification(db, teacher_id, notification_id).await?;

        let mut active: notification::ActiveModel = found.into();
        active.seen = Set(true);
        Ok(active.update(db).await?)
    }

    pub async fn delete_notification(
        db: &DatabaseConnection,
        teacher_id: i32,
        notification_id: i32,
    ) -> Result<(), ServiceError> {
        let found = Self::notification(db, teacher_id, notification_id).await?;
        found.delete(db).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{TestDb, fixtures};
    use testresult::TestResult;

    #[tokio::test]
    async fn test_dashboard_counts_only_paid_sales() -> TestResult {
        let db = TestDb::new().await?;
        let teacher = fixtures::teacher(&db, "ada").await?;
        let rust = fixtures::course(&db, teacher.id, "Rust", 100_00).await?;
        let go = fixtures::course(&db, teacher.id, "Go", 40_00).await?;
        let bob = fixtures::user(&db, "bob").await?;
        let eve = fixtures::user(&db, "eve").await?;

        fixtures::purchase(&db, bob.id, &[rust.id, go.id]).await?;
        fixtures::purchase(&db, eve.id, &[rust.id]).await?;

        let summary = TeacherService::summary(&db, teacher.id).await?;
        assert_eq!(summary.total_courses, 2);
        assert_eq!(summary.total_students, 2);
        assert_eq!(summary.total_revenue, 240_00);
        assert_eq!(summary.monthly_revenue, 240_00);

        let earnings = TeacherService::monthly_earnings(&db, teacher.id).await?;
        assert_eq!(earnings.len(), 1);
        assert_eq!(earnings[0].total, 240_00);

        let ranked = TeacherService::best_selling_courses(&db, teacher.id).await?;
        assert_eq!(ranked[0].course.id, rust.id);
        assert_eq!(ranked[0].sales, 2);
        assert_eq!(ranked[0].revenue, 200_00);

        let students = TeacherService::students(&db, teacher.id).await?;
        assert_eq!(students.len(), 2);
        assert_eq!(students[0].country.as_deref(), Some("Canada"));

        assert_eq!(TeacherService::order_items(&db, teacher.id).await?.len(), 3);
        assert_eq!(TeacherService::unseen_notifications(&db, teacher.id).await?.len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_coupon_crud_is_scoped_to_teacher() -> TestResult {
        let db = TestDb::new().await?;
        let ada = fixtures::teacher(&db, "ada").await?;
        let grace = fixtures::teacher(&db, "grace").await?;

        let draft = CouponDraft {
            code: " WELCOME ".to_string(),
            discount: 15,
            active: true,
        };
        let created = TeacherService::create_coupon(&db, ada.id, draft).await?;
        assert_eq!(created.code, "WELCOME");

        let foreign = TeacherService::coupon(&db, grace.id, created.id).await;
        assert!(matches!(foreign, Err(ServiceError::NotFound("coupon"))));

        let invalid = TeacherService::update_coupon(
            &db,
            ada.id,
            created.id,
            CouponDraft {
                code: "WELCOME".to_string(),
                discount: 150,
                active: true,
            },
        )
        .await;
        assert!(matches!(invalid, Err(ServiceError::Validation(_))));

        TeacherService::delete_coupon(&db, ada.id, created.id).await?;
        assert!(TeacherService::coupons(&db, ada.id).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_reply_and_notifications() -> TestResult {
        let db = TestDb::new().await?;
        let ada = fixtures::teacher(&db, "ada").await?;
        let grace = fixtures::teacher(&db, "grace").await?;
        let bob = fixtures::user(&db, "bob").await?;
        let course = fixtures::course(&db, ada.id, "Rust", 10_00).await?;
        let review = fixtures::review(&db, bob.id, course.id, 4).await?;

        let denied =
            TeacherService::reply_review(&db, grace.id, review.id, "Hi".to_string(), None).await;
        assert!(matches!(denied, Err(ServiceError::NotFound("review"))));

        let replied = TeacherService::reply_review(
            &db,
            ada.id,
            review.id,
            "Thanks!".to_string(),
            Some(false),
        )
        .await?;
        assert_eq!(replied.reply.as_deref(), Some("Thanks!"));
        assert!(!replied.active);
        assert_eq!(TeacherService::reviews(&db, ada.id).await?.len(), 1);

        fixtures::purchase(&db, bob.id, &[course.id]).await?;
        let unseen = TeacherService::unseen_notifications(&db, ada.id).await?;
        assert_eq!(unseen.len(), 1);

        TeacherService::mark_notification_seen(&db, ada.id, unseen[0].id).await?;
        assert!(TeacherService::unseen_notifications(&db, ada.id).await?.is_empty());

        TeacherService::delete_notification(&db, ada.id, unseen[0].id).await?;
        let gone = TeacherService::mark_notification_seen(&db, ada.id, unseen[0].id).await;
        assert!(matches!(gone, Err(ServiceError::NotFound("notification"))));

        Ok(())
    }
}
