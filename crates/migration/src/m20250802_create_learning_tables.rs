use sea_orm_migration::prelude::*;

use crate::idens::{
    CartOrderItems, CartOrders, Certificates, CompletedLessons, Courses, Notes, Notifications,
    QuestionAnswerMessages, QuestionAnswers, Reviews, Teachers, Users, VariantItems, Wishlists,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create completed_lessons table
        manager
            .create_table(
                Table::create()
                    .table(CompletedLessons::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CompletedLessons::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CompletedLessons::CourseId).integer().not_null())
                    .col(ColumnDef::new(CompletedLessons::UserId).integer().not_null())
                    .col(ColumnDef::new(CompletedLessons::VariantItemId).integer().not_null())
                    .col(
                        ColumnDef::new(CompletedLessons::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-completed_lessons-course_id")
                            .from(CompletedLessons::Table, CompletedLessons::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-completed_lessons-user_id")
                            .from(CompletedLessons::Table, CompletedLessons::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-completed_lessons-variant_item_id")
                            .from(CompletedLessons::Table, CompletedLessons::VariantItemId)
                            .to(VariantItems::Table, VariantItems::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create notes table
        manager
            .create_table(
                Table::create()
                    .table(Notes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notes::Code).string().not_null().unique_key())
                    .col(ColumnDef::new(Notes::UserId).integer().not_null())
                    .col(ColumnDef::new(Notes::CourseId).integer().not_null())
                    .col(ColumnDef::new(Notes::Title).string())
                    .col(ColumnDef::new(Notes::Note).text().not_null())
                    .col(
                        ColumnDef::new(Notes::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-notes-user_id")
                            .from(Notes::Table, Notes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-notes-course_id")
                            .from(Notes::Table, Notes::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create reviews table; rating is 1 to 5
        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reviews::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reviews::UserId).integer())
                    .col(ColumnDef::new(Reviews::CourseId).integer().not_null())
                    .col(ColumnDef::new(Reviews::Review).text().not_null())
                    .col(ColumnDef::new(Reviews::Rating).integer().not_null())
                    .col(ColumnDef::new(Reviews::Reply).text())
                    .col(ColumnDef::new(Reviews::Active).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(Reviews::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-reviews-user_id")
                            .from(Reviews::Table, Reviews::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-reviews-course_id")
                            .from(Reviews::Table, Reviews::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create question_answers table (Q&A threads)
        manager
            .create_table(
                Table::create()
                    .table(QuestionAnswers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuestionAnswers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(QuestionAnswers::QaId).string().not_null().unique_key())
                    .col(ColumnDef::new(QuestionAnswers::CourseId).integer().not_null())
                    .col(ColumnDef::new(QuestionAnswers::UserId).integer())
                    .col(ColumnDef::new(QuestionAnswers::Title).string())
                    .col(
                        ColumnDef::new(QuestionAnswers::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-question_answers-course_id")
                            .from(QuestionAnswers::Table, QuestionAnswers::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-question_answers-user_id")
                            .from(QuestionAnswers::Table, QuestionAnswers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create question_answer_messages table
        manager
            .create_table(
                Table::create()
                    .table(QuestionAnswerMessages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuestionAnswerMessages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(QuestionAnswerMessages::QamId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(QuestionAnswerMessages::CourseId).integer().not_null())
                    .col(ColumnDef::new(QuestionAnswerMessages::UserId).integer())
                    .col(ColumnDef::new(QuestionAnswerMessages::QuestionId).integer().not_null())
                    .col(ColumnDef::new(QuestionAnswerMessages::Message).text().not_null())
                    .col(
                        ColumnDef::new(QuestionAnswerMessages::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-question_answer_messages-course_id")
                            .from(QuestionAnswerMessages::Table, QuestionAnswerMessages::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-question_answer_messages-user_id")
                            .from(QuestionAnswerMessages::Table, QuestionAnswerMessages::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-question_answer_messages-question_id")
                            .from(QuestionAnswerMessages::Table, QuestionAnswerMessages::QuestionId)
                            .to(QuestionAnswers::Table, QuestionAnswers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create wishlists table
        manager
            .create_table(
                Table::create()
                    .table(Wishlists::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Wishlists::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Wishlists::UserId).integer().not_null())
                    .col(ColumnDef::new(Wishlists::CourseId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-wishlists-user_id")
                            .from(Wishlists::Table, Wishlists::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-wishlists-course_id")
                            .from(Wishlists::Table, Wishlists::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create certificates table
        manager
            .create_table(
                Table::create()
                    .table(Certificates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Certificates::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Certificates::CertificateId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Certificates::CourseId).integer().not_null())
                    .col(ColumnDef::new(Certificates::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(Certificates::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-certificates-course_id")
                            .from(Certificates::Table, Certificates::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-certificates-user_id")
                            .from(Certificates::Table, Certificates::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create notifications table; fanned out on payment and review events
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::UserId).integer())
                    .col(ColumnDef::new(Notifications::TeacherId).integer())
                    .col(ColumnDef::new(Notifications::OrderId).integer())
                    .col(ColumnDef::new(Notifications::OrderItemId).integer())
                    .col(ColumnDef::new(Notifications::ReviewId).integer())
                    .col(ColumnDef::new(Notifications::Kind).text().not_null())
                    .col(ColumnDef::new(Notifications::Seen).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-notifications-user_id")
                            .from(Notifications::Table, Notifications::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-notifications-teacher_id")
                            .from(Notifications::Table, Notifications::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-notifications-order_id")
                            .from(Notifications::Table, Notifications::OrderId)
                            .to(CartOrders::Table, CartOrders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-notifications-order_item_id")
                            .from(Notifications::Table, Notifications::OrderItemId)
                            .to(CartOrderItems::Table, CartOrderItems::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-notifications-review_id")
                            .from(Notifications::Table, Notifications::ReviewId)
                            .to(Reviews::Table, Reviews::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Certificates::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Wishlists::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(QuestionAnswerMessages::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(QuestionAnswers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Reviews::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Notes::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CompletedLessons::Table).to_owned())
            .await?;

        Ok(())
    }
}
