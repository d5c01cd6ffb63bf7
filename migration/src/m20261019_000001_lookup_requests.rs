//! 查询审计表迁移
//!
//! 创建 lookup_requests 表，每次上游查询（成功或失败）写入一行：
//! - IP 地址
//! - 查询时间
//! - 查询结果 (lookup_status)

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LookupRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LookupRequests::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LookupRequests::IpAddress)
                            .string_len(45)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LookupRequests::LookupTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LookupRequests::LookupStatus)
                            .boolean()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 按 IP 查询审计记录
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_lookup_requests_ip_address")
                    .table(LookupRequests::Table)
                    .col(LookupRequests::IpAddress)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_lookup_requests_lookup_time")
                    .table(LookupRequests::Table)
                    .col(LookupRequests::LookupTime)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_lookup_requests_lookup_time")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_lookup_requests_ip_address")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(LookupRequests::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum LookupRequests {
    #[sea_orm(iden = "lookup_requests")]
    Table,
    Id,
    IpAddress,
    LookupTime,
    LookupStatus,
}
