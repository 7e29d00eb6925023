//! # Labora Core
//!
//! Presentational core of the Labora food-material dashboard.
//!
//! This crate contains the logic every view shares:
//! - the material data model and its tolerant deserialisation ([`material`])
//! - diet-category translation and headline nutrient selection ([`categories`], [`card`])
//! - search/category filtering ([`filter`]) and its debounced view state ([`view`])
//! - pie-chart data assembly for the detail view ([`chart`])
//! - the add/edit form model and pre-submit validation ([`form`])
//! - the explicit session context ([`session`])
//!
//! **No transport concerns**: HTTP calls to the backend belong in `api-client`.

pub mod card;
pub mod categories;
pub mod chart;
pub mod config;
pub mod confirm;
pub mod constants;
pub mod debounce;
pub mod error;
pub mod filter;
pub mod form;
pub mod material;
pub mod session;
pub mod view;

pub use card::MaterialCard;
pub use categories::{
    select_headline, translate_categories, DietCategory, Headline, HeadlineStat, UnknownTagOrder,
};
pub use chart::{ChartData, ChartSlice};
pub use config::CoreConfig;
pub use confirm::{delete_prompt, is_confirmation};
pub use debounce::Debouncer;
pub use error::{CoreError, CoreResult};
pub use filter::{filter_materials, CategoryFilter, FilterQuery};
pub use form::{MaterialForm, ValidatedForm};
pub use material::{Material, MaterialStats, Nutrient};
pub use session::{AuthUser, SessionContext};
pub use view::{FilteredMaterials, MaterialListView};

pub use labora_types::{EmailAddress, NonEmptyText, Secret};
