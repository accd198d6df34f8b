use models::status::NotificationType;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Addressed to a student (`user_id`) or a teacher (`teacher_id`)
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Option<i32>,
    pub teacher_id: Option<i32>,
    pub order_id: Option<i32>,
    pub order_item_id: Option<i32>,
    pub review_id: Option<i32>,
    pub kind: NotificationType,
    pub seen: bool,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teacher::Entity",
        from = "Column::TeacherId",
        to = "super::teacher::Column::Id"
    )]
    Teacher,
    #[sea_orm(
        belongs_to = "super::cart_order::Entity",
        from = "Column::OrderId",
        to = "super::cart_order::Column::Id"
    )]
    Order,
}

impl Related<super::cart_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
