use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Set once the email address is confirmed via OTP.
    pub verified: bool,

    /// ISO 4217 code, e.g. "USD"
    pub currency: String,

    /// ISO 3166 alpha-2 code, e.g. "US"
    pub country: String,

    pub two_factor_enabled: bool,

    /// Base32 TOTP secret. Present while 2FA is pending or active.
    pub two_factor_secret: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
