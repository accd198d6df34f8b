use models::status::PaymentStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An order built from a cart snapshot; all amounts are cents
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cart_orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub oid: String,
    pub student_id: Option<i32>,
    pub sub_total: i64,
    pub tax_fee: i64,
    pub total: i64,
    pub initial_total: i64, // never changes after creation
    pub saved: i64,
    pub payment_status: PaymentStatus,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    pub stripe_session_id: Option<String>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id"
    )]
    Student,
    #[sea_orm(has_many = "super::cart_order_item::Entity")]
    Items,
    #[sea_orm(has_many = "super::order_teacher::Entity")]
    OrderTeachers,
    #[sea_orm(has_many = "super::order_coupon::Entity")]
    OrderCoupons,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::cart_order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

// Many-to-many relationship with teachers
impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        super::order_teacher::Relation::Teacher.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::order_teacher::Relation::Order.def().rev())
    }
}

// Many-to-many relationship with coupons
impl Related<super::coupon::Entity> for Entity {
    fn to() -> RelationDef {
        super::order_coupon::Relation::Coupon.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::order_coupon::Relation::Order.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
