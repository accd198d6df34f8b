//! In-memory SQLite harness for service tests

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::ops::Deref;

/// A freshly migrated database; one pooled connection so every query sees
/// the same in-memory schema
pub struct TestDb {
    conn: DatabaseConnection,
}

impl TestDb {
    pub async fn new() -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let conn = Database::connect(options).await?;
        Migrator::up(&conn, None).await?;

        Ok(Self { conn })
    }
}

impl Deref for TestDb {
    type Target = DatabaseConnection;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

pub mod fixtures {
    use crate::entities::{coupon, course, country, review, teacher, user, variant, variant_item};
    use crate::services::now;
    use models::{codes, status::TeacherCourseStatus, text::course_slug};
    use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DbErr, EntityTrait};

    pub async fn user(db: &DatabaseConnection, username: &str) -> Result<user::Model, DbErr> {
        user::ActiveModel {
            username: Set(username.to_string()),
            email: Set(format!("{username}@example.com")),
            full_name: Set(username.to_uppercase()),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// Creates a user together with their teacher profile
    pub async fn teacher(db: &DatabaseConnection, username: &str) -> Result<teacher::Model, DbErr> {
        let user = user(db, username).await?;

        teacher::ActiveModel {
            user_id: Set(user.id),
            full_name: Set(user.full_name.clone()),
            country: Set(Some("Canada".to_string())),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// A published course priced in cents
    pub async fn course(
        db: &DatabaseConnection,
        teacher_id: i32,
        title: &str,
        price: i64,
    ) -> Result<course::Model, DbErr> {
        let created = course::ActiveModel {
            code: Set(codes::course_code()),
            teacher_id: Set(teacher_id),
            title: Set(title.to_string()),
            description: Set(format!("All about {title}")),
            price: Set(price),
            level: Set(Default::default()),
            language: Set(Default::default()),
            platform_status: Set(Default::default()),
            teacher_course_status: Set(Default::default()),
            featured: Set(false),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        let mut active: course::ActiveModel = created.clone().into();
        active.slug = Set(Some(course_slug(&created.title, created.id)));
        active.update(db).await
    }

    pub async fn set_teacher_status(
        db: &DatabaseConnection,
        course_id: i32,
        status: TeacherCourseStatus,
    ) -> Result<(), DbErr> {
        let found = course::Entity::find_by_id(course_id)
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound("course".to_string()))?;

        let mut active: course::ActiveModel = found.into();
        active.teacher_course_status = Set(status);
        active.update(db).await?;
        Ok(())
    }

    pub async fn variant(
        db: &DatabaseConnection,
        course_id: i32,
        title: &str,
    ) -> Result<variant::Model, DbErr> {
        variant::ActiveModel {
            course_id: Set(course_id),
            code: Set(codes::variant_code()),
            title: Set(title.to_string()),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn variant_item(
        db: &DatabaseConnection,
        variant_id: i32,
        title: &str,
    ) -> Result<variant_item::Model, DbErr> {
        variant_item::ActiveModel {
            variant_id: Set(variant_id),
            code: Set(codes::variant_item_code()),
            title: Set(title.to_string()),
            preview: Set(false),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn review(
        db: &DatabaseConnection,
        user_id: i32,
        course_id: i32,
        rating: i32,
    ) -> Result<review::Model, DbErr> {
        review::ActiveModel {
            user_id: Set(Some(user_id)),
            course_id: Set(course_id),
            review: Set("Solid material".to_string()),
            rating: Set(rating),
            active: Set(true),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn country(
        db: &DatabaseConnection,
        name: &str,
        tax_rate: i32,
    ) -> Result<country::Model, DbErr> {
        country::ActiveModel {
            name: Set(name.to_string()),
            tax_rate: Set(tax_rate),
            active: Set(true),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn coupon(
        db: &DatabaseConnection,
        teacher_id: i32,
        code: &str,
        discount: i32,
    ) -> Result<coupon::Model, DbErr> {
        coupon::ActiveModel {
            teacher_id: Set(Some(teacher_id)),
            code: Set(code.to_string()),
            discount: Set(discount),
            active: Set(true),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// Buys the courses through cart, order and settlement, returning the
    /// enrollments
    pub async fn purchase(
        db: &DatabaseConnection,
        student_id: i32,
        course_ids: &[i32],
    ) -> Result<Vec<crate::entities::enrolled_course::Model>, crate::ServiceError> {
        use crate::services::{
            CartLineRequest, CartService, NewOrder, OrderService, Settlement, SettlementService,
        };

        let cart_id = format!("cart-{student_id}-{}", codes::order_code());
        for &course_id in course_ids {
            let course = course::Entity::find_by_id(course_id)
                .one(db)
                .await?
                .ok_or(crate::ServiceError::NotFound("course"))?;
            CartService::upsert_line(
                db,
                CartLineRequest {
                    cart_id: cart_id.clone(),
                    course_id,
                    user_id: Some(student_id),
                    price: course.price,
                    country: "Canada".to_string(),
                },
            )
            .await?;
        }

        let order = OrderService::create_order(
            db,
            NewOrder {
                full_name: "Student".to_string(),
                email: "student@example.com".to_string(),
                country: "Canada".to_string(),
                cart_id,
                user_id: Some(student_id),
            },
        )
        .await?;

        match SettlementService::mark_paid(db, &order.oid).await? {
            Settlement::Paid { enrollments, .. } => Ok(enrollments),
            Settlement::AlreadyPaid(_) => Ok(vec![]),
        }
    }
}
