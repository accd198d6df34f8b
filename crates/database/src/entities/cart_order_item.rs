use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One purchased course within an order, discountable on its own
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cart_order_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub oid: String,
    pub order_id: i32,
    pub course_id: i32,
    pub teacher_id: i32, // copied from the course at creation
    pub price: i64,
    pub tax_fee: i64,
    pub total: i64,
    pub initial_total: i64,
    pub saved: i64,
    pub applied_coupon: bool,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cart_order::Entity",
        from = "Column::OrderId",
        to = "super::cart_order::Column::Id"
    )]
    Order,
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::teacher::Entity",
        from = "Column::TeacherId",
        to = "super::teacher::Column::Id"
    )]
    Teacher,
    #[sea_orm(has_many = "super::order_item_coupon::Entity")]
    ItemCoupons,
}

impl Related<super::cart_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

// Many-to-many relationship with coupons
impl Related<super::coupon::Entity> for Entity {
    fn to() -> RelationDef {
        super::order_item_coupon::Relation::Coupon.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::order_item_coupon::Relation::OrderItem.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
