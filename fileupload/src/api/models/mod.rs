//! Request and query shapes for the HTTP API.

pub mod file_contents;

use serde::Deserialize;
use utoipa::IntoParams;

use crate::types::Sort;

/// Query parameters accepted by list endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Ordering as `field[,asc|desc]`, with field one of `id`, `name`, `contentContentType`
    #[param(value_type = Option<String>, example = "id,desc")]
    pub sort: Option<Sort>,
}
