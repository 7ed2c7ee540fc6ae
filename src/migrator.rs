use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_reference_tables::Migration),
            Box::new(m20240301_000002_create_measurement_tables::Migration),
            Box::new(m20240301_000003_create_prediction_tables::Migration),
            Box::new(m20240301_000004_create_location_table::Migration),
        ]
    }
}

mod m20240301_000001_create_reference_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000001_create_reference_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Brand::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Brand::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Brand::Name).string().not_null().unique_key())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Warehouse::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Warehouse::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Warehouse::Name).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Stack::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Stack::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Stack::Name).string().not_null())
                        .col(ColumnDef::new(Stack::WarehouseId).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_stack_warehouse")
                                .from(Stack::Table, Stack::WarehouseId)
                                .to(Warehouse::Table, Warehouse::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // Stack names repeat across warehouses but never within one
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uix_stack_warehouse_name")
                        .table(Stack::Table)
                        .col(Stack::WarehouseId)
                        .col(Stack::Name)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_warehouse_name")
                        .table(Warehouse::Table)
                        .col(Warehouse::Name)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Stack::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Warehouse::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Brand::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Brand {
        Table,
        Id,
        Name,
    }

    #[derive(DeriveIden)]
    pub(super) enum Warehouse {
        Table,
        Id,
        Name,
    }

    #[derive(DeriveIden)]
    pub(super) enum Stack {
        Table,
        Id,
        Name,
        WarehouseId,
    }
}

mod m20240301_000002_create_measurement_tables {

    use super::m20240301_000001_create_reference_tables::{Brand, Stack};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000002_create_measurement_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Supplies::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Supplies::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Supplies::BrandId).integer().not_null())
                        .col(ColumnDef::new(Supplies::StackId).integer().not_null())
                        .col(ColumnDef::new(Supplies::WarehouseDate).date().not_null())
                        .col(ColumnDef::new(Supplies::WarehouseWeight).decimal_len(15, 4).null())
                        .col(ColumnDef::new(Supplies::ShipDate).date().null())
                        .col(ColumnDef::new(Supplies::ShipWeight).decimal_len(15, 4).null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_supplies_brand")
                                .from(Supplies::Table, Supplies::BrandId)
                                .to(Brand::Table, Brand::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_supplies_stack")
                                .from(Supplies::Table, Supplies::StackId)
                                .to(Stack::Table, Stack::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Temperature::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Temperature::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Temperature::BrandId).integer().not_null())
                        .col(ColumnDef::new(Temperature::StackId).integer().not_null())
                        .col(ColumnDef::new(Temperature::MaxTemperature).decimal_len(5, 2).null())
                        .col(
                            ColumnDef::new(Temperature::Picket)
                                .string_len(200)
                                .not_null()
                                .default(""),
                        )
                        .col(ColumnDef::new(Temperature::ActDate).date().not_null())
                        .col(ColumnDef::new(Temperature::Shift).integer().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_temperature_brand")
                                .from(Temperature::Table, Temperature::BrandId)
                                .to(Brand::Table, Brand::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_temperature_stack")
                                .from(Temperature::Table, Temperature::StackId)
                                .to(Stack::Table, Stack::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_supplies_stack_id")
                        .table(Supplies::Table)
                        .col(Supplies::StackId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_temperature_stack_date")
                        .table(Temperature::Table)
                        .col(Temperature::StackId)
                        .col(Temperature::ActDate)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Temperature::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Supplies::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Supplies {
        Table,
        Id,
        BrandId,
        StackId,
        WarehouseDate,
        WarehouseWeight,
        ShipDate,
        ShipWeight,
    }

    #[derive(DeriveIden)]
    enum Temperature {
        Table,
        Id,
        BrandId,
        StackId,
        MaxTemperature,
        Picket,
        ActDate,
        Shift,
    }
}

mod m20240301_000003_create_prediction_tables {

    use super::m20240301_000001_create_reference_tables::{Brand, Stack};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000003_create_prediction_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            for (table, prefix) in [
                (Prediction::Predict, "predict"),
                (Prediction::CurrentPredict, "current_predict"),
            ] {
                manager
                    .create_table(
                        Table::create()
                            .table(table)
                            .if_not_exists()
                            .col(
                                ColumnDef::new(Prediction::Id)
                                    .integer()
                                    .not_null()
                                    .auto_increment()
                                    .primary_key(),
                            )
                            .col(ColumnDef::new(Prediction::BrandId).integer().not_null())
                            .col(ColumnDef::new(Prediction::StackId).integer().not_null())
                            .col(ColumnDef::new(Prediction::Date).date().not_null())
                            .col(ColumnDef::new(Prediction::Weight).double().null())
                            .foreign_key(
                                ForeignKey::create()
                                    .name(format!("fk_{prefix}_brand"))
                                    .from(table, Prediction::BrandId)
                                    .to(Brand::Table, Brand::Id)
                                    .on_delete(ForeignKeyAction::Cascade),
                            )
                            .foreign_key(
                                ForeignKey::create()
                                    .name(format!("fk_{prefix}_stack"))
                                    .from(table, Prediction::StackId)
                                    .to(Stack::Table, Stack::Id)
                                    .on_delete(ForeignKeyAction::Cascade),
                            )
                            .to_owned(),
                    )
                    .await?;

                manager
                    .create_index(
                        Index::create()
                            .if_not_exists()
                            .name(format!("idx_{prefix}_date"))
                            .table(table)
                            .col(Prediction::Date)
                            .to_owned(),
                    )
                    .await?;
            }
            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Prediction::CurrentPredict).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Prediction::Predict).to_owned())
                .await
        }
    }

    // Both tables share one column layout
    #[derive(DeriveIden, Clone, Copy)]
    enum Prediction {
        Predict,
        CurrentPredict,
        Id,
        BrandId,
        StackId,
        Date,
        Weight,
    }
}

mod m20240301_000004_create_location_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000004_create_location_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Location::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Location::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Location::Latitude).double().not_null())
                        .col(ColumnDef::new(Location::Longitude).double().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Location::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Location {
        Table,
        Id,
        Latitude,
        Longitude,
    }
}
