//! 广告投放日数据实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ad_spend")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub date: String,
    pub campaign_id: String,
    pub campaign_name: String,
    #[sea_orm(column_type = "Double")]
    pub amount_spent: f64,
    pub impressions: i64,
    pub reach: i64,
    pub link_clicks: i64,
    pub results: i64,
    pub glitch_noted: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub glitch_details: Option<String>,
    pub created_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
