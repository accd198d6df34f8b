use crate::{
    ServiceError,
    entities::{category, course, teacher, variant, variant_item},
    services::{CatalogService, Curriculum, now},
};
use log::info;
use models::{
    codes,
    curriculum::{CourseDraft, CurriculumItem, CurriculumVariant, resolve_media},
    text::{course_slug, format_duration},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, ModelTrait, QueryFilter, TransactionTrait,
};

pub struct CurriculumService;

impl CurriculumService {
    /// Create a course with its whole curriculum in one transaction
    pub async fn create_course(
        db: &DatabaseConnection,
        teacher_id: i32,
        draft: CourseDraft,
    ) -> Result<(course::Model, Curriculum), ServiceError> {
        validate_draft(&draft)?;
        if teacher::Entity::find_by_id(teacher_id).one(db).await?.is_none() {
            return Err(ServiceError::NotFound("teacher"));
        }

        let txn = db.begin().await?;
        let category_id = existing_category(&txn, draft.category_id).await?;

        let created = course::ActiveModel {
            code: Set(codes::course_code()),
            category_id: Set(category_id),
            teacher_id: Set(teacher_id),
            title: Set(draft.title),
            description: Set(draft.description),
            image: Set(draft.image),
            file: Set(draft.file),
            price: Set(draft.price),
            level: Set(draft.level),
            language: Set(draft.language),
            platform_status: Set(Default::default()),
            teacher_course_status: Set(draft.teacher_course_status),
            featured: Set(draft.featured),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let slug = course_slug(&created.title, created.id);
        let mut active: course::ActiveModel = created.into();
        active.slug = Set(Some(slug));
        let course = active.update(&txn).await?;

        for section in draft.variants {
            let saved = Self::insert_variant(&txn, course.id, &section.title).await?;
            for item in section.items {
                Self::insert_item(&txn, saved.id, item).await?;
            }
        }

        let curriculum = CatalogService::curriculum(&txn, course.id).await?;
        txn.commit().await?;

        info!("Teacher {teacher_id} created course {}", course.code);
        Ok((course, curriculum))
    }

    /// Update a course and merge the submitted curriculum into it
    ///
    /// Variants and items are matched by their public codes within the
    /// course; unmatched entries are created and nothing is removed.
    pub async fn update_course(
        db: &DatabaseConnection,
        teacher_id: i32,
        course_code: &str,
        draft: CourseDraft,
    ) -> Result<(course::Model, Curriculum), ServiceError> {
        validate_draft(&draft)?;

        let txn = db.begin().await?;
        let existing = owned_course(&txn, teacher_id, course_code).await?;
        let category_id = existing_category(&txn, draft.category_id).await?;

        let image = resolve_media(existing.image.clone(), draft.image);
        let file = resolve_media(existing.file.clone(), draft.file);

        let existing_id = existing.id;
        let mut active: course::ActiveModel = existing.into();
        if category_id.is_some() {
            active.category_id = Set(category_id);
        }
        active.slug = Set(Some(course_slug(&draft.title, existing_id)));
        active.title = Set(draft.title);
        active.description = Set(draft.description);
        active.image = Set(image);
        active.file = Set(file);
        active.price = Set(draft.price);
        active.level = Set(draft.level);
        active.language = Set(draft.language);
        active.teacher_course_status = Set(draft.teacher_course_status);
        active.featured = Set(draft.featured);
        let course = active.update(&txn).await?;

        for section in draft.variants {
            Self::merge_variant(&txn, course.id, section).await?;
        }

        let curriculum = CatalogService::curriculum(&txn, course.id).await?;
        txn.commit().await?;

        info!("Teacher {teacher_id} updated course {}", course.code);
        Ok((course, curriculum))
    }

    async fn merge_variant(
        txn: &DatabaseTransaction,
        course_id: i32,
        section: CurriculumVariant,
    ) -> Result<(), ServiceError> {
        let matched = match section.variant_id.as_deref() {
            Some(code) => {
                variant::Entity::find()
                    .filter(variant::Column::CourseId.eq(course_id))
                    .filter(variant::Column::Code.eq(code))
                    .one(txn)
                    .await?
            }
            None => None,
        };

        let saved = match matched {
            Some(found) => {
                let mut active: variant::ActiveModel = found.into();
                active.title = Set(section.title);
                active.update(txn).await?
            }
            None => Self::insert_variant(txn, course_id, &section.title).await?,
        };

        for item in section.items {
            let matched = match item.variant_item_id.as_deref() {
                Some(code) => {
                    variant_item::Entity::find()
                        .filter(variant_item::Column::VariantId.eq(saved.id))
                        .filter(variant_item::Column::Code.eq(code))
                        .one(txn)
                        .await?
                }
                None => None,
            };

            match matched {
                Some(found) => {
                    let file = resolve_media(found.file.clone(), item.file);
                    let mut active: variant_item::ActiveModel = found.into();
                    active.title = Set(item.title);
                    active.description = Set(item.description);
                    active.preview = Set(item.preview);
                    active.file = Set(file);
                    if let Some(seconds) = item.duration_seconds {
                        active.duration_seconds = Set(Some(seconds));
                        active.content_duration = Set(Some(format_duration(seconds)));
                    }
                    active.update(txn).await?;
                }
                None => {
                    Self::insert_item(txn, saved.id, item).await?;
                }
            }
        }

        Ok(())
    }

    async fn insert_variant(
        txn: &DatabaseTransaction,
        course_id: i32,
        title: &str,
    ) -> Result<variant::Model, ServiceError> {
        Ok(variant::ActiveModel {
            course_id: Set(course_id),
            code: Set(codes::variant_code()),
            title: Set(title.to_string()),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(txn)
        .await?)
    }

    async fn insert_item(
        txn: &DatabaseTransaction,
        variant_id: i32,
        item: CurriculumItem,
    ) -> Result<variant_item::Model, ServiceError> {
        Ok(variant_item::ActiveModel {
            variant_id: Set(variant_id),
            code: Set(codes::variant_item_code()),
            title: Set(item.title),
            description: Set(item.description),
            file: Set(item.file),
            duration_seconds: Set(item.duration_seconds),
            content_duration: Set(item.duration_seconds.map(format_duration)),
            preview: Set(item.preview),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(txn)
        .await?)
    }

    /// Delete a variant and, through the cascade, its items
    pub async fn delete_variant(
        db: &DatabaseConnection,
        teacher_id: i32,
        course_code: &str,
        variant_code: &str,
    ) -> Result<(), ServiceError> {
        let course = owned_course(db, teacher_id, course_code).await?;
        let found = owned_variant(db, course.id, variant_code).await?;

        found.delete(db).await?;
        Ok(())
    }

    pub async fn delete_variant_item(
        db: &DatabaseConnection,
        teacher_id: i32,
        course_code: &str,
        variant_code: &str,
        item_code: &str,
    ) -> Result<(), ServiceError> {
        let course = owned_course(db, teacher_id, course_code).await?;
        let parent = owned_variant(db, course.id, variant_code).await?;

        let result = variant_item::Entity::delete_many()
            .filter(variant_item::Column::VariantId.eq(parent.id))
            .filter(variant_item::Column::Code.eq(item_code))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound("lesson"));
        }
        Ok(())
    }

    pub async fn delete_course(
        db: &DatabaseConnection,
        teacher_id: i32,
        course_code: &str,
    ) -> Result<(), ServiceError> {
        let found = owned_course(db, teacher_id, course_code).await?;
        found.delete(db).await?;

        info!("Teacher {teacher_id} deleted course {course_code}");
        Ok(())
    }
}

fn validate_draft(draft: &CourseDraft) -> Result<(), ServiceError> {
    if draft.title.trim().is_empty() {
        return Err(ServiceError::Validation("course title is required".to_string()));
    }
    if draft.price < 0 {
        return Err(ServiceError::Validation("price must not be negative".to_string()));
    }
    if let Some(section) = draft.variants.iter().find(|v| v.title.trim().is_empty()) {
        return Err(ServiceError::Validation(format!(
            "variant {:?} needs a title",
            section.variant_id
        )));
    }
    Ok(())
}

/// The category id when it names an existing category
async fn existing_category<C: ConnectionTrait>(
    db: &C,
    category_id: Option<i32>,
) -> Result<Option<i32>, ServiceError> {
    let Some(id) = category_id else {
        return Ok(None);
    };

    Ok(category::Entity::find_by_id(id)
        .one(db)
        .await?
        .map(|category| category.id))
}

async fn owned_course<C: ConnectionTrait>(
    db: &C,
    teacher_id: i32,
    course_code: &str,
) -> Result<course::Model, ServiceError> {
    course::Entity::find()
        .filter(course::Column::TeacherId.eq(teacher_id))
        .filter(course::Column::Code.eq(course_code))
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound("course"))
}

async fn owned_variant<C: ConnectionTrait>(
    db: &C,
    course_id: i32,
    variant_code: &str,
) -> Result<variant::Model, ServiceError> {
    variant::Entity::find()
        .filter(variant::Column::CourseId.eq(course_id))
        .filter(variant::Column::Code.eq(variant_code))
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound("variant"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{TestDb, fixtures};
    use models::status::Level;
    use testresult::TestResult;

    fn item(title: &str) -> CurriculumItem {
        CurriculumItem {
            title: title.to_string(),
            file: Some(format!("uploads/{title}.mp4")),
            duration_seconds: Some(125.9),
            ..Default::default()
        }
    }

    fn draft() -> CourseDraft {
        CourseDraft {
            title: "Systems Programming in Rust".to_string(),
            description: "From pointers to async".to_string(),
            price: 80_00,
            image: Some("uploads/cover.png".to_string()),
            variants: vec![
                CurriculumVariant {
                    title: "Basics".to_string(),
                    items: vec![item("ownership"), item("borrowing")],
                    ..Default::default()
                },
                CurriculumVariant {
                    title: "Async".to_string(),
                    items: vec![item("futures")],
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_course_with_curriculum() -> TestResult {
        let db = TestDb::new().await?;
        let teacher = fixtures::teacher(&db, "ada").await?;

        let (course, curriculum) =
            CurriculumService::create_course(&db, teacher.id, draft()).await?;

        assert_eq!(
            course.slug,
            Some(format!("systems-programming-in-rust-{}", course.id))
        );
        assert_eq!(course.code.len(), 6);
        assert_eq!(curriculum.len(), 2);
        assert_eq!(curriculum[0].1.len(), 2);
        assert_eq!(curriculum[0].1[0].content_duration.as_deref(), Some("2m 5s"));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_merges_by_public_code() -> TestResult {
        let db = TestDb::new().await?;
        let teacher = fixtures::teacher(&db, "ada").await?;
        let (course, curriculum) =
            CurriculumService::create_course(&db, teacher.id, draft()).await?;
        let (basics, basics_items) = &curriculum[0];
        let ownership = &basics_items[0];

        let mut edit = draft();
        edit.title = "Async Rust".to_string();
        edit.level = Level::Advanced;
        edit.image = Some("https://cdn.example.com/uploads/cover.png".to_string());
        edit.file = None;
        edit.category_id = Some(999);
        edit.variants = vec![CurriculumVariant {
            variant_id: Some(basics.code.clone()),
            title: "Fundamentals".to_string(),
            items: vec![
                CurriculumItem {
                    variant_item_id: Some(ownership.code.clone()),
                    title: "Ownership rules".to_string(),
                    file: Some("https://cdn.example.com/uploads/ownership.mp4".to_string()),
                    preview: true,
                    ..Default::default()
                },
                item("lifetimes"),
            ],
        }];

        let (updated, merged) =
            CurriculumService::update_course(&db, teacher.id, &course.code, edit).await?;

        assert_eq!(updated.level, Level::Advanced);
        assert_eq!(updated.slug, Some(format!("async-rust-{}", course.id)));
        assert_eq!(updated.image.as_deref(), Some("uploads/cover.png"));
        assert_eq!(updated.category_id, None);
        assert_eq!(merged.len(), 2);

        let (section, items) = &merged[0];
        assert_eq!(section.id, basics.id);
        assert_eq!(section.title, "Fundamentals");
        assert_eq!(items.len(), 3);

        let renamed = items.iter().find(|i| i.id == ownership.id);
        assert_eq!(renamed.map(|i| i.title.as_str()), Some("Ownership rules"));
        assert_eq!(
            renamed.and_then(|i| i.file.as_deref()),
            Some("uploads/ownership.mp4")
        );
        assert_eq!(renamed.map(|i| i.preview), Some(true));

        Ok(())
    }

    #[tokio::test]
    async fn test_deletes_are_scoped_to_owner() -> TestResult {
        let db = TestDb::new().await?;
        let ada = fixtures::teacher(&db, "ada").await?;
        let grace = fixtures::teacher(&db, "grace").await?;
        let (course, curriculum) = CurriculumService::create_course(&db, ada.id, draft()).await?;
        let (basics, items) = &curriculum[0];

        let foreign =
            CurriculumService::delete_variant(&db, grace.id, &course.code, &basics.code).await;
        assert!(matches!(foreign, Err(ServiceError::NotFound("course"))));

        CurriculumService::delete_variant_item(
            &db,
            ada.id,
            &course.code,
            &basics.code,
            &items[0].code,
        )
        .await?;
        CurriculumService::delete_variant(&db, ada.id, &course.code, &basics.code).await?;

        let remaining = CatalogService::curriculum(&*db, course.id).await?;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].0.title, "Async");

        CurriculumService::delete_course(&db, ada.id, &course.code).await?;
        assert!(course::Entity::find_by_id(course.id).one(&*db).await?.is_none());

        Ok(())
    }
}
