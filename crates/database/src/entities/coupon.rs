use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Teacher-scoped percentage discount code
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "coupons")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub teacher_id: Option<i32>,
    pub code: String,
    pub discount: i32, // whole percent
    pub active: bool,
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
    #[sea_orm(has_many = "super::coupon_user::Entity")]
    UsedBy,
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::coupon_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UsedBy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
