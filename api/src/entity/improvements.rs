//! `improvements` table: one flat row per Improvement and its Original

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "improvements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub uuid: Uuid,
    #[sea_orm(column_type = "Text")]
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub summary: String,
    #[sea_orm(column_type = "Text")]
    pub title_orig: String,
    #[sea_orm(column_type = "Text")]
    pub summary_orig: String,
    #[sea_orm(column_type = "Text")]
    pub link_orig: String,
    /// Empty string when the original carried no image
    #[sea_orm(column_type = "Text")]
    pub image_link_orig: String,
    /// Original publish date, seconds since the Unix epoch (UTC)
    pub date_orig_ts: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
