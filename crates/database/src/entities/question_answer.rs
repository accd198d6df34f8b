use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A Q&A thread opened on a course
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "question_answers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub qa_id: String,
    pub course_id: i32,
    pub user_id: Option<i32>,
    pub title: Option<String>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::question_answer_message::Entity")]
    Messages,
}

impl Related<super::question_answer_message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
