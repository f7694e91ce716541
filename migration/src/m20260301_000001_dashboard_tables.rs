use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 ad_spend 表（每个 campaign 每天一行）
        manager
            .create_table(
                Table::create()
                    .table(AdSpend::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdSpend::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    // 固定宽度 YYYY-MM-DD，字典序即日期序
                    .col(ColumnDef::new(AdSpend::Date).string_len(10).not_null())
                    .col(ColumnDef::new(AdSpend::CampaignId).string().not_null())
                    .col(ColumnDef::new(AdSpend::CampaignName).string().not_null())
                    .col(
                        ColumnDef::new(AdSpend::AmountSpent)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(AdSpend::Impressions)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AdSpend::Reach)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AdSpend::LinkClicks)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AdSpend::Results)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AdSpend::GlitchNoted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(AdSpend::GlitchDetails).text().null())
                    .col(
                        ColumnDef::new(AdSpend::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdSpend::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_ad_spend_date")
                    .table(AdSpend::Table)
                    .col(AdSpend::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_ad_spend_campaign_id")
                    .table(AdSpend::Table)
                    .col(AdSpend::CampaignId)
                    .to_owned(),
            )
            .await?;

        // 创建 call_inquiries 表（按渠道/国家/语言的每日批量计数）
        manager
            .create_table(
                Table::create()
                    .table(CallInquiry::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CallInquiry::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CallInquiry::Date).string_len(10).not_null())
                    .col(ColumnDef::new(CallInquiry::CallType).string_len(16).not_null())
                    .col(ColumnDef::new(CallInquiry::Language).string_len(16).not_null())
                    .col(ColumnDef::new(CallInquiry::CountryName).string().not_null())
                    .col(ColumnDef::new(CallInquiry::IsoCode).string_len(8).not_null())
                    .col(ColumnDef::new(CallInquiry::DialingCode).string_len(16).not_null())
                    .col(
                        ColumnDef::new(CallInquiry::TotalCalls)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CallInquiry::QuotationSent)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CallInquiry::Wins)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CallInquiry::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CallInquiry::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_call_inquiries_date")
                    .table(CallInquiry::Table)
                    .col(CallInquiry::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_call_inquiries_country")
                    .table(CallInquiry::Table)
                    .col(CallInquiry::CountryName)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_call_inquiries_country").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_call_inquiries_date").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CallInquiry::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_ad_spend_campaign_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_ad_spend_date").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AdSpend::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AdSpend {
    #[sea_orm(iden = "ad_spend")]
    Table,
    Id,
    Date,
    CampaignId,
    CampaignName,
    AmountSpent,
    Impressions,
    Reach,
    LinkClicks,
    Results,
    GlitchNoted,
    GlitchDetails,
    CreatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum CallInquiry {
    #[sea_orm(iden = "call_inquiries")]
    Table,
    Id,
    Date,
    CallType,
    Language,
    CountryName,
    IsoCode,
    DialingCode,
    TotalCalls,
    QuotationSent,
    Wins,
    CreatedAt,
    DeletedAt,
}
