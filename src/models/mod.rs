pub mod channel;
pub mod episode;
pub mod genre;
pub mod season;
pub mod show;
pub mod user;

pub use channel::Channel;
pub use episode::Episode;
pub use genre::Genre;
pub use season::Season;
pub use show::Show;
pub use user::UserProfile;

/// Implements [`crate::db::Document`] for a model with an `id: String` field.
macro_rules! impl_document {
    ($($model:ty),+ $(,)?) => {
        $(
            impl crate::db::Document for $model {
                fn id(&self) -> &str {
                    &self.id
                }

                fn set_id(&mut self, id: String) {
                    self.id = id;
                }
            }
        )+
    };
}

impl_document!(Channel, Episode, Genre, Season, Show, UserProfile);
