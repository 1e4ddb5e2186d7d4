//! SeaORM entities for database tables

/// Activities table
pub mod activity {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "activities")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,

        /// Optimistic concurrency counter
        pub version: i32,

        pub name: String,

        #[sea_orm(column_type = "Text", nullable)]
        pub description: Option<String>,

        pub application_deadline: Option<DateTimeUtc>,

        pub final_deadline: Option<DateTimeUtc>,

        pub created_at: DateTimeUtc,

        pub updated_at: DateTimeUtc,

        pub status: String,

        /// Foreign key to users
        pub owner_id: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::user::Entity",
            from = "Column::OwnerId",
            to = "super::user::Column::Id",
            on_delete = "Restrict"
        )]
        Owner,
    }

    impl Related<super::user::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Owner.def()
        }
    }

    impl Related<super::technology::Entity> for Entity {
        fn to() -> RelationDef {
            super::activity_technology::Relation::Technology.def()
        }

        fn via() -> Option<RelationDef> {
            Some(super::activity_technology::Relation::Activity.def().rev())
        }
    }

    impl Related<super::activity_type::Entity> for Entity {
        fn to() -> RelationDef {
            super::activity_activity_type::Relation::ActivityType.def()
        }

        fn via() -> Option<RelationDef> {
            Some(super::activity_activity_type::Relation::Activity.def().rev())
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Users table
pub mod user {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,

        /// Optimistic concurrency counter
        pub version: i32,

        #[sea_orm(unique)]
        pub email: String,

        pub first_name: String,

        pub last_name: String,

        #[sea_orm(column_type = "Text", nullable)]
        pub bio: Option<String>,

        pub created_at: DateTimeUtc,

        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::activity::Entity")]
        Activities,
    }

    impl Related<super::activity::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Activities.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Technology lookup table
pub mod technology {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "technologies")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,

        #[sea_orm(unique)]
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Activity type lookup table
pub mod activity_type {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "activity_types")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,

        #[sea_orm(unique)]
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Activity ↔ technology association table
pub mod activity_technology {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "activity_technologies")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub activity_id: i32,

        #[sea_orm(primary_key, auto_increment = false)]
        pub technology_id: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::activity::Entity",
            from = "Column::ActivityId",
            to = "super::activity::Column::Id",
            on_delete = "Cascade"
        )]
        Activity,
        #[sea_orm(
            belongs_to = "super::technology::Entity",
            from = "Column::TechnologyId",
            to = "super::technology::Column::Id",
            on_delete = "Cascade"
        )]
        Technology,
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Activity ↔ activity type association table
pub mod activity_activity_type {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "activity_activity_types")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub activity_id: i32,

        #[sea_orm(primary_key, auto_increment = false)]
        pub activity_type_id: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::activity::Entity",
            from = "Column::ActivityId",
            to = "super::activity::Column::Id",
            on_delete = "Cascade"
        )]
        Activity,
        #[sea_orm(
            belongs_to = "super::activity_type::Entity",
            from = "Column::ActivityTypeId",
            to = "super::activity_type::Column::Id",
            on_delete = "Cascade"
        )]
        ActivityType,
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Feedback left between users
pub mod feedback {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "feedback")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,

        /// User the feedback is about
        pub user_to_id: i32,

        /// Author, cleared when the author is deleted
        pub user_from_id: Option<i32>,

        pub stars: i32,

        #[sea_orm(column_type = "Text", nullable)]
        pub comment: Option<String>,

        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::user::Entity",
            from = "Column::UserToId",
            to = "super::user::Column::Id",
            on_delete = "Cascade"
        )]
        UserTo,
    }

    impl Related<super::user::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::UserTo.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}
