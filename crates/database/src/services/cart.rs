use crate::{
    ServiceError,
    entities::{cart, country, course, user},
    services::now,
};
use log::{info, warn};
use models::money::{Cents, LineAmounts};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder,
};
use serde::Serialize;

/// Country charged when the requested one is unknown; it carries no tax
pub const FALLBACK_COUNTRY: &str = "United States";

#[derive(Debug, Clone)]
pub struct CartLineRequest {
    pub cart_id: String,
    pub course_id: i32,
    pub user_id: Option<i32>,
    /// Unit price in cents
    pub price: Cents,
    pub country: String,
}

#[derive(Debug, Clone)]
pub enum CartUpsert {
    Created(cart::Model),
    Updated(cart::Model),
}

impl CartUpsert {
    pub fn line(&self) -> &cart::Model {
        match self {
            Self::Created(line) | Self::Updated(line) => line,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CartStats {
    pub price: Cents,
    pub tax: Cents,
    pub total: Cents,
}

pub struct CartService;

impl CartService {
    /// Insert or update the line for (cart id, course), pricing tax for the
    /// requested country
    pub async fn upsert_line(
        db: &DatabaseConnection,
        request: CartLineRequest,
    ) -> Result<CartUpsert, ServiceError> {
        if request.price < 0 {
            return Err(ServiceError::Validation(
                "price must not be negative".to_string(),
            ));
        }

        let course = course::Entity::find_by_id(request.course_id)
            .one(db)
            .await?
            .filter(course::Model::is_published)
            .ok_or(ServiceError::NotFound("course"))?;

        if let Some(user_id) = request.user_id
            && user::Entity::find_by_id(user_id).one(db).await?.is_none()
        {
            return Err(ServiceError::NotFound("user"));
        }

        let (country_name, tax_rate) = Self::resolve_tax(db, &request.country).await;
        let amounts = LineAmounts::with_tax(request.price, tax_rate)?;

        let existing = cart::Entity::find()
            .filter(cart::Column::CartId.eq(request.cart_id.as_str()))
            .filter(cart::Column::CourseId.eq(course.id))
            .one(db)
            .await?;

        match existing {
            Some(line) => {
                let mut active: cart::ActiveModel = line.into();
                active.user_id = Set(request.user_id);
                active.price = Set(amounts.price);
                active.tax_fee = Set(amounts.tax_fee);
                active.total = Set(amounts.total);
                active.country = Set(Some(country_name));
                let updated = active.update(db).await?;

                info!("Updated cart {} line for course {}", updated.cart_id, course.id);
                Ok(CartUpsert::Updated(updated))
            }
            None => {
                let created = cart::ActiveModel {
                    cart_id: Set(request.cart_id),
                    course_id: Set(course.id),
                    user_id: Set(request.user_id),
                    price: Set(amounts.price),
                    tax_fee: Set(amounts.tax_fee),
                    total: Set(amounts.total),
                    country: Set(Some(country_name)),
                    created_at: Set(now()),
                    ..Default::default()
                }
                .insert(db)
                .await?;

                info!("Added course {} to cart {}", course.id, created.cart_id);
                Ok(CartUpsert::Created(created))
            }
        }
    }

    /// Exact-name country lookup; unknown names and lookup failures fall back
    /// to an untaxed default
    async fn resolve_tax(db: &DatabaseConnection, country_name: &str) -> (String, i32) {
        let found = country::Entity::find()
            .filter(country::Column::Name.eq(country_name))
            .one(db)
            .await;

        match found {
            Ok(Some(country)) => (country.name, country.tax_rate),
            Ok(None) => (FALLBACK_COUNTRY.to_string(), 0),
            Err(e) => {
                warn!("Country lookup for {country_name:?} failed, charging no tax: {e}");
                (FALLBACK_COUNTRY.to_string(), 0)
            }
        }
    }

    /// Lines of an anonymous cart merged with the lines a known user owns
    pub async fn list(
        db: &DatabaseConnection,
        cart_id: &str,
        user_id: Option<i32>,
    ) -> Result<Vec<(cart::Model, Option<course::Model>)>, DbErr> {
        let mut condition = Condition::any().add(cart::Column::CartId.eq(cart_id));
        if let Some(user_id) = user_id {
            condition = condition.add(cart::Column::UserId.eq(user_id));
        }

        cart::Entity::find()
            .filter(condition)
            .order_by_asc(cart::Column::Id)
            .find_also_related(course::Entity)
            .all(db)
            .await
    }

    /// Sums over the lines of one cart, narrowed to a user when given
    pub async fn stats(
        db: &DatabaseConnection,
        cart_id: &str,
        user_id: Option<i32>,
    ) -> Result<CartStats, DbErr> {
        let mut query = cart::Entity::find().filter(cart::Column::CartId.eq(cart_id));
        if let Some(user_id) = user_id {
            query = query.filter(cart::Column::UserId.eq(user_id));
        }

        let lines = query.all(db).await?;

        Ok(lines.iter().fold(CartStats::default(), |acc, line| CartStats {
            price: acc.price + line.price,
            tax: acc.tax + line.tax_fee,
            total: acc.total + line.total,
        }))
    }

    pub async fn delete_line(
        db: &DatabaseConnection,
        cart_id: &str,
        line_id: i32,
    ) -> Result<(), ServiceError> {
        let result = cart::Entity::delete_many()
            .filter(cart::Column::CartId.eq(cart_id))
            .filter(cart::Column::Id.eq(line_id))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound("cart item"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{TestDb, fixtures};
    use models::status::TeacherCourseStatus;
    use testresult::TestResult;

    fn request(cart_id: &str, course_id: i32, price: Cents, country: &str) -> CartLineRequest {
        CartLineRequest {
            cart_id: cart_id.to_string(),
            course_id,
            user_id: None,
            price,
            country: country.to_string(),
        }
    }

    #[tokio::test]
    async fn test_tax_is_charged_per_country() -> TestResult {
        let db = TestDb::new().await?;
        fixtures::country(&db, "Canada", 10).await?;
        let teacher = fixtures::teacher(&db, "ada").await?;
        let course = fixtures::course(&db, teacher.id, "Rust Basics", 100_00).await?;

        let outcome =
            CartService::upsert_line(&db, request("c1", course.id, 100_00, "Canada")).await?;

        let line = outcome.line();
        assert!(matches!(outcome, CartUpsert::Created(_)));
        assert_eq!(line.tax_fee, 10_00);
        assert_eq!(line.total, 110_00);
        assert_eq!(line.country.as_deref(), Some("Canada"));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_country_falls_back_untaxed() -> TestResult {
        let db = TestDb::new().await?;
        let teacher = fixtures::teacher(&db, "ada").await?;
        let course = fixtures::course(&db, teacher.id, "Rust Basics", 40_00).await?;

        let outcome =
            CartService::upsert_line(&db, request("c1", course.id, 40_00, "Atlantis")).await?;

        assert_eq!(outcome.line().tax_fee, 0);
        assert_eq!(outcome.line().total, 40_00);
        assert_eq!(outcome.line().country.as_deref(), Some(FALLBACK_COUNTRY));

        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_updates_the_same_line() -> TestResult {
        let db = TestDb::new().await?;
        fixtures::country(&db, "Canada", 10).await?;
        let teacher = fixtures::teacher(&db, "ada").await?;
        let course = fixtures::course(&db, teacher.id, "Rust Basics", 100_00).await?;

        CartService::upsert_line(&db, request("c1", course.id, 100_00, "Canada")).await?;
        let second =
            CartService::upsert_line(&db, request("c1", course.id, 50_00, "Canada")).await?;

        assert!(matches!(second, CartUpsert::Updated(_)));
        let lines = CartService::list(&db, "c1", None).await?;
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0.total, 55_00);

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_or_unpublished_course_is_rejected() -> TestResult {
        let db = TestDb::new().await?;
        let teacher = fixtures::teacher(&db, "ada").await?;
        let course = fixtures::course(&db, teacher.id, "Rust Basics", 10_00).await?;
        fixtures::set_teacher_status(&db, course.id, TeacherCourseStatus::Disabled).await?;

        let missing = CartService::upsert_line(&db, request("c1", 999, 10_00, "Canada")).await;
        assert!(matches!(missing, Err(ServiceError::NotFound("course"))));

        let hidden = CartService::upsert_line(&db, request("c1", course.id, 10_00, "Canada")).await;
        assert!(matches!(hidden, Err(ServiceError::NotFound("course"))));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_merges_user_lines_and_stats_sum() -> TestResult {
        let db = TestDb::new().await?;
        fixtures::country(&db, "Canada", 10).await?;
        let teacher = fixtures::teacher(&db, "ada").await?;
        let student = fixtures::user(&db, "bob").await?;
        let rust = fixtures::course(&db, teacher.id, "Rust Basics", 100_00).await?;
        let go = fixtures::course(&db, teacher.id, "Go Basics", 50_00).await?;

        CartService::upsert_line(&db, request("anon", rust.id, 100_00, "Canada")).await?;
        let mut owned = request("mine", go.id, 50_00, "Canada");
        owned.user_id = Some(student.id);
        CartService::upsert_line(&db, owned).await?;

        let merged = CartService::list(&db, "anon", Some(student.id)).await?;
        assert_eq!(merged.len(), 2);

        let stats = CartService::stats(&db, "anon", None).await?;
        assert_eq!(
            stats,
            CartStats {
                price: 100_00,
                tax: 10_00,
                total: 110_00
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_line() -> TestResult {
        let db = TestDb::new().await?;
        let teacher = fixtures::teacher(&db, "ada").await?;
        let course = fixtures::course(&db, teacher.id, "Rust Basics", 10_00).await?;
        let line = CartService::upsert_line(&db, request("c1", course.id, 10_00, "Canada")).await?;

        let wrong_cart = CartService::delete_line(&db, "other", line.line().id).await;
        assert!(matches!(wrong_cart, Err(ServiceError::NotFound(_))));

        CartService::delete_line(&db, "c1", line.line().id).await?;
        assert!(CartService::list(&db, "c1", None).await?.is_empty());

        Ok(())
    }
}
