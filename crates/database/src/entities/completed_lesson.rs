use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "completed_lessons")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub course_id: i32,
    pub user_id: i32,
    pub variant_item_id: i32,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::variant_item::Entity",
        from = "Column::VariantItemId",
        to = "super::variant_item::Column::Id"
    )]
    VariantItem,
}

impl Related<super::variant_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VariantItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
