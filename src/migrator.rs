use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_products_table::Migration),
            Box::new(m20240601_000002_create_warehouses_table::Migration),
            Box::new(m20240601_000003_create_vehicles_table::Migration),
            Box::new(m20240601_000004_create_users_table::Migration),
            Box::new(m20240601_000005_create_inventory_lines_table::Migration),
            Box::new(m20240601_000006_create_orders_table::Migration),
        ]
    }
}

mod m20240601_000001_create_products_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000001_create_products_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Products::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Products::Name).string().not_null())
                        .col(ColumnDef::new(Products::FuelType).string().not_null())
                        .col(ColumnDef::new(Products::UnitPrice).decimal().not_null())
                        .col(ColumnDef::new(Products::Unit).string().not_null())
                        .col(ColumnDef::new(Products::Description).string())
                        .col(
                            ColumnDef::new(Products::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Products {
        Table,
        Id,
        Name,
        FuelType,
        UnitPrice,
        Unit,
        Description,
        CreatedAt,
    }
}

mod m20240601_000002_create_warehouses_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000002_create_warehouses_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Warehouses::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Warehouses::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Warehouses::Name).string().not_null())
                        .col(ColumnDef::new(Warehouses::Location).string().not_null())
                        .col(
                            ColumnDef::new(Warehouses::TotalCapacity)
                                .decimal()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Warehouses::Unit).string().not_null())
                        .col(
                            ColumnDef::new(Warehouses::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Warehouses::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Warehouses {
        Table,
        Id,
        Name,
        Location,
        TotalCapacity,
        Unit,
        CreatedAt,
    }
}

mod m20240601_000003_create_vehicles_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000003_create_vehicles_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Vehicles::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Vehicles::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Vehicles::Plate)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Vehicles::Make).string().not_null())
                        .col(ColumnDef::new(Vehicles::Model).string().not_null())
                        .col(ColumnDef::new(Vehicles::Year).integer())
                        .col(
                            ColumnDef::new(Vehicles::CapacityLiters)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Vehicles::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Vehicles::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Vehicles {
        Table,
        Id,
        Plate,
        Make,
        Model,
        Year,
        CapacityLiters,
        CreatedAt,
    }
}

mod m20240601_000004_create_users_table {
    use sea_orm_migration::prelude::*;

    use super::m20240601_000003_create_vehicles_table::Vehicles;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000004_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                        .col(ColumnDef::new(Users::Name).string().not_null())
                        .col(
                            ColumnDef::new(Users::NationalId)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::Phone).string())
                        .col(ColumnDef::new(Users::Address).string())
                        .col(ColumnDef::new(Users::Role).string().not_null())
                        .col(ColumnDef::new(Users::VehicleId).uuid())
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-users-vehicle")
                                .from(Users::Table, Users::VehicleId)
                                .to(Vehicles::Table, Vehicles::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Users {
        Table,
        Id,
        Email,
        Name,
        NationalId,
        Phone,
        Address,
        Role,
        VehicleId,
        CreatedAt,
    }
}

mod m20240601_000005_create_inventory_lines_table {
    use sea_orm_migration::prelude::*;

    use super::m20240601_000001_create_products_table::Products;
    use super::m20240601_000002_create_warehouses_table::Warehouses;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000005_create_inventory_lines_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InventoryLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryLines::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryLines::WarehouseId).uuid().not_null())
                        .col(ColumnDef::new(InventoryLines::ProductId).uuid().not_null())
                        .col(ColumnDef::new(InventoryLines::Quantity).decimal().not_null())
                        .col(
                            ColumnDef::new(InventoryLines::ReceivedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-inventory-warehouse")
                                .from(InventoryLines::Table, InventoryLines::WarehouseId)
                                .to(Warehouses::Table, Warehouses::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-inventory-product")
                                .from(InventoryLines::Table, InventoryLines::ProductId)
                                .to(Products::Table, Products::Id),
                        )
                        .to_owned(),
                )
                .await?;

            // One line per (warehouse, product) pair.
            manager
                .create_index(
                    Index::create()
                        .name("idx-inventory-warehouse-product")
                        .table(InventoryLines::Table)
                        .col(InventoryLines::WarehouseId)
                        .col(InventoryLines::ProductId)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InventoryLines::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum InventoryLines {
        Table,
        Id,
        WarehouseId,
        ProductId,
        Quantity,
        ReceivedAt,
    }
}

mod m20240601_000006_create_orders_table {
    use sea_orm_migration::prelude::*;

    use super::m20240601_000001_create_products_table::Products;
    use super::m20240601_000002_create_warehouses_table::Warehouses;
    use super::m20240601_000004_create_users_table::Users;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000006_create_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Orders::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Orders::CustomerId).uuid().not_null())
                        .col(ColumnDef::new(Orders::ProductId).uuid().not_null())
                        .col(ColumnDef::new(Orders::DriverId).uuid())
                        .col(ColumnDef::new(Orders::WarehouseId).uuid().not_null())
                        .col(ColumnDef::new(Orders::RequestedVolume).decimal().not_null())
                        .col(ColumnDef::new(Orders::DeliveredVolume).decimal())
                        .col(ColumnDef::new(Orders::WindowStart).timestamp_with_time_zone())
                        .col(ColumnDef::new(Orders::WindowEnd).timestamp_with_time_zone())
                        .col(ColumnDef::new(Orders::DeliveryLocation).string().not_null())
                        .col(ColumnDef::new(Orders::Status).string().not_null())
                        .col(ColumnDef::new(Orders::UnitPrice).decimal().not_null())
                        .col(ColumnDef::new(Orders::Total).decimal().not_null())
                        .col(ColumnDef::new(Orders::Paid).boolean().not_null())
                        .col(ColumnDef::new(Orders::PaymentMethod).string())
                        .col(ColumnDef::new(Orders::Notes).string())
                        .col(
                            ColumnDef::new(Orders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Orders::DeliveredAt).timestamp_with_time_zone())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-orders-customer")
                                .from(Orders::Table, Orders::CustomerId)
                                .to(Users::Table, Users::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-orders-product")
                                .from(Orders::Table, Orders::ProductId)
                                .to(Products::Table, Products::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-orders-driver")
                                .from(Orders::Table, Orders::DriverId)
                                .to(Users::Table, Users::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-orders-warehouse")
                                .from(Orders::Table, Orders::WarehouseId)
                                .to(Warehouses::Table, Warehouses::Id),
                        )
                        .to_owned(),
                )
                .await?;

            // Committed-volume lookups filter on (warehouse, product, status).
            manager
                .create_index(
                    Index::create()
                        .name("idx-orders-warehouse-product-status")
                        .table(Orders::Table)
                        .col(Orders::WarehouseId)
                        .col(Orders::ProductId)
                        .col(Orders::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Orders {
        Table,
        Id,
        CustomerId,
        ProductId,
        DriverId,
        WarehouseId,
        RequestedVolume,
        DeliveredVolume,
        WindowStart,
        WindowEnd,
        DeliveryLocation,
        Status,
        UnitPrice,
        Total,
        Paid,
        PaymentMethod,
        Notes,
        CreatedAt,
        DeliveredAt,
    }
}
