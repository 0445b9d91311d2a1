//! `/categorias` endpoints.

use super::{ApiClient, ApiRequest, Listing, Method};
use crate::Result;
use crate::models::{Category, CategoryDraft};

impl ApiClient {
    /// `GET /categorias`. Accepts a flat array or a paged envelope.
    pub fn list_categories(&self) -> Result<Vec<Category>> {
        let listing: Listing<Category> = self.fetch(ApiRequest::get("/categorias"))?;
        Ok(listing.into_items())
    }

    /// `GET /categorias/{id}`.
    pub fn get_category(&self, id: i64) -> Result<Category> {
        self.fetch(ApiRequest::get(format!("/categorias/{}", id)))
    }

    /// `GET /categorias/buscar?nombre=`.
    pub fn search_categories(&self, name: &str) -> Result<Vec<Category>> {
        let request = ApiRequest::get("/categorias/buscar").with_query("nombre", name);
        let listing: Listing<Category> = self.fetch(request)?;
        Ok(listing.into_items())
    }

    /// `POST /categorias`.
    pub fn create_category(&self, draft: &CategoryDraft) -> Result<Category> {
        self.fetch(Self::json_request(Method::Post, "/categorias", draft)?)
    }

    /// `PUT /categorias/{id}`.
    pub fn update_category(&self, id: i64, draft: &CategoryDraft) -> Result<Category> {
        self.fetch(Self::json_request(
            Method::Put,
            format!("/categorias/{}", id),
            draft,
        )?)
    }

    /// `DELETE /categorias/{id}`.
    pub fn delete_category(&self, id: i64) -> Result<()> {
        self.execute(&ApiRequest::delete(format!("/categorias/{}", id)))?;
        Ok(())
    }
}
