use sea_orm::entity::prelude::*;

/// Optional per-user profile. Every column besides the key may be null.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    pub nickname: Option<String>,
    pub avatar_url: Option<String>,
    pub age: Option<i32>,
    /// `male`, `female` or `other`.
    pub gender: Option<String>,
    pub height_cm: Option<i32>,
    pub weight_kg: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub hobbies: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
