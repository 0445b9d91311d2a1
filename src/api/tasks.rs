//! `/tareas` endpoints.

use super::{ApiClient, ApiRequest, Listing, Method, Page, PageRequest};
use crate::Result;
use crate::models::{Task, TaskDraft};

impl ApiClient {
    /// `GET /tareas?page&size&sort`, scoped by the server to the caller.
    pub fn list_tasks(&self, page: &PageRequest) -> Result<Page<Task>> {
        let mut request = ApiRequest::get("/tareas")
            .with_query("page", page.page)
            .with_query("size", page.size);
        if let Some(sort) = &page.sort {
            request = request.with_query("sort", sort);
        }
        let listing: Listing<Task> = self.fetch(request)?;
        Ok(listing.into_page(page.page))
    }

    /// `GET /tareas/usuario/{id}?page&size`.
    pub fn list_user_tasks(&self, owner_id: i64, page: &PageRequest) -> Result<Page<Task>> {
        let request = ApiRequest::get(format!("/tareas/usuario/{}", owner_id))
            .with_query("page", page.page)
            .with_query("size", page.size);
        let listing: Listing<Task> = self.fetch(request)?;
        Ok(listing.into_page(page.page))
    }

    /// `GET /tareas/{id}`.
    pub fn get_task(&self, id: i64) -> Result<Task> {
        self.fetch(ApiRequest::get(format!("/tareas/{}", id)))
    }

    /// `POST /tareas`.
    pub fn create_task(&self, draft: &TaskDraft) -> Result<Task> {
        self.fetch(Self::json_request(Method::Post, "/tareas", draft)?)
    }

    /// `PUT /tareas/{id}`.
    pub fn update_task(&self, id: i64, draft: &TaskDraft) -> Result<Task> {
        self.fetch(Self::json_request(Method::Put, format!("/tareas/{}", id), draft)?)
    }

    /// `PATCH /tareas/{id}/completar`.
    pub fn complete_task(&self, id: i64) -> Result<Task> {
        self.fetch(ApiRequest::new(
            Method::Patch,
            format!("/tareas/{}/completar", id),
        ))
    }

    /// `PATCH /tareas/{id}/pendiente`.
    pub fn mark_pending(&self, id: i64) -> Result<Task> {
        self.fetch(ApiRequest::new(
            Method::Patch,
            format!("/tareas/{}/pendiente", id),
        ))
    }

    /// `DELETE /tareas/{id}`.
    pub fn delete_task(&self, id: i64) -> Result<()> {
        self.execute(&ApiRequest::delete(format!("/tareas/{}", id)))?;
        Ok(())
    }
}
