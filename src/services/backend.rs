use async_trait::async_trait;
use reqwest::{StatusCode, Url};

use crate::errors::BackendError;
use crate::models::{
    ApiReply, Appointment, AppointmentList, AppointmentStatus, BaselineSetup, BookingRequest,
    Category, HighDemandMonth, Registration, RemoteUser, SlotBlock, SlotList,
};

/// The remote appointment API. Owns appointments, users, scores and baselines.
#[async_trait]
pub trait AppointmentApi: Send + Sync {
    async fn all_appointments(&self) -> Result<Vec<Appointment>, BackendError>;
    async fn available_slots(&self) -> Result<Vec<Appointment>, BackendError>;
    async fn booked_appointments(&self) -> Result<Vec<Appointment>, BackendError>;

    async fn add_block(&self, block: &SlotBlock) -> Result<ApiReply, BackendError>;
    async fn delete_slot(&self, id: &str) -> Result<ApiReply, BackendError>;
    async fn set_status(&self, id: &str, status: AppointmentStatus)
        -> Result<ApiReply, BackendError>;
    async fn book(&self, id: &str, request: &BookingRequest) -> Result<ApiReply, BackendError>;

    async fn list_users(&self) -> Result<Vec<RemoteUser>, BackendError>;
    /// `None` when the API does not know the user.
    async fn get_user(&self, user_name: &str) -> Result<Option<RemoteUser>, BackendError>;
    async fn register_user(&self, registration: &Registration) -> Result<(), BackendError>;
    async fn set_category(&self, user_name: &str, category: Category)
        -> Result<ApiReply, BackendError>;

    /// `None` when no baseline exists for that month.
    async fn high_demand(
        &self,
        doctor_name: &str,
        year: i32,
        month: u32,
    ) -> Result<Option<HighDemandMonth>, BackendError>;
    async fn setup_high_demand(&self, setup: &BaselineSetup) -> Result<ApiReply, BackendError>;
}

pub struct HttpAppointmentApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpAppointmentApi {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| BackendError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_appointments(&self, which: &str) -> Result<Vec<Appointment>, BackendError> {
        let list: AppointmentList = self
            .client
            .get(self.url(&["appointments", which])?)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(list.appointments)
    }
}

/// Decode an action reply, turning non-2xx answers into `Rejected` with the API's text.
async fn read_reply(resp: reqwest::Response) -> Result<ApiReply, BackendError> {
    let status = resp.status();
    let reply: ApiReply = resp.json().await.unwrap_or_default();

    if !status.is_success() {
        return Err(BackendError::Rejected {
            status: status.as_u16(),
            message: reply.message.or(reply.error),
        });
    }
    Ok(reply)
}

#[async_trait]
impl AppointmentApi for HttpAppointmentApi {
    async fn all_appointments(&self) -> Result<Vec<Appointment>, BackendError> {
        self.get_appointments("all").await
    }

    async fn available_slots(&self) -> Result<Vec<Appointment>, BackendError> {
        let list: SlotList = self
            .client
            .get(self.url(&["appointments", "available"])?)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(list.slots)
    }

    async fn booked_appointments(&self) -> Result<Vec<Appointment>, BackendError> {
        self.get_appointments("booked").await
    }

    async fn add_block(&self, block: &SlotBlock) -> Result<ApiReply, BackendError> {
        let resp = self
            .client
            .post(self.url(&["appointments", "add"])?)
            .json(block)
            .send()
            .await?;
        read_reply(resp).await
    }

    async fn delete_slot(&self, id: &str) -> Result<ApiReply, BackendError> {
        let resp = self
            .client
            .delete(self.url(&["appointments", "delete", id])?)
            .send()
            .await?;
        read_reply(resp).await
    }

    async fn set_status(
        &self,
        id: &str,
        status: AppointmentStatus,
    ) -> Result<ApiReply, BackendError> {
        let resp = self
            .client
            .post(self.url(&["appointments", "status", id])?)
            .json(&serde_json::json!({ "status": status }))
            .send()
            .await?;
        read_reply(resp).await
    }

    async fn book(&self, id: &str, request: &BookingRequest) -> Result<ApiReply, BackendError> {
        let resp = self
            .client
            .post(self.url(&["appointments", "book", id])?)
            .json(request)
            .send()
            .await?;
        read_reply(resp).await
    }

    async fn list_users(&self) -> Result<Vec<RemoteUser>, BackendError> {
        let users = self
            .client
            .get(self.url(&["users"])?)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(users)
    }

    async fn get_user(&self, user_name: &str) -> Result<Option<RemoteUser>, BackendError> {
        let resp = self
            .client
            .get(self.url(&["users", user_name])?)
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let user = resp.error_for_status()?.json().await?;
        Ok(Some(user))
    }

    async fn register_user(&self, registration: &Registration) -> Result<(), BackendError> {
        self.client
            .post(self.url(&["users", "register"])?)
            .json(registration)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn set_category(
        &self,
        user_name: &str,
        category: Category,
    ) -> Result<ApiReply, BackendError> {
        let resp = self
            .client
            .post(self.url(&["admin", "set-category"])?)
            .json(&serde_json::json!({ "userName": user_name, "category": category }))
            .send()
            .await?;
        read_reply(resp).await
    }

    async fn high_demand(
        &self,
        doctor_name: &str,
        year: i32,
        month: u32,
    ) -> Result<Option<HighDemandMonth>, BackendError> {
        let mut url = self.url(&["high-demand"])?;
        url.query_pairs_mut()
            .append_pair("doctorName", doctor_name)
            .append_pair("year", &year.to_string())
            .append_pair("month", &month.to_string());

        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            return Ok(None);
        }
        Ok(Some(resp.json().await?))
    }

    async fn setup_high_demand(&self, setup: &BaselineSetup) -> Result<ApiReply, BackendError> {
        let resp = self
            .client
            .post(self.url(&["high-demand", "setup"])?)
            .json(setup)
            .send()
            .await?;
        read_reply(resp).await
    }
}
