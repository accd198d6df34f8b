pub use sea_orm_migration::prelude::*;

mod idens;
mod m20250801_create_catalog_tables;
mod m20250801_create_commerce_tables;
mod m20250802_create_learning_tables;
mod m20250803_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_create_catalog_tables::Migration),
            Box::new(m20250801_create_commerce_tables::Migration),
            Box::new(m20250802_create_learning_tables::Migration),
            Box::new(m20250803_add_indexes::Migration),
        ]
    }
}
