use std::path::Path;

use chrono::NaiveDate;
use reqwest::blocking::{Client as HttpClient, Response, multipart};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{
    Client, ClientCreateRequest, ClientDetail, ClientUpdateRequest, ConversionRecord,
    ConvertRequest, Document,
    DocumentType, HealthCreateRequest, HealthDetail, InsuranceType, Note, NoteCreateRequest,
    NoteTextPatch, NotesSummary, QuoteCreateRequest, Quote, RenewRequest, SetRenewalRequest,
    VehicleCreateRequest, VehicleDetail,
};

/// Blocking client for the CRM's REST API. Every call is an independent
/// request/response pair; there are no retries and no cancellation.
pub struct Api {
    base: String,
    http: HttpClient,
}

impl Api {
    pub fn new(base: &str) -> Api {
        Api {
            base: base.trim_end_matches('/').to_string(),
            http: HttpClient::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Non-2xx responses are failures regardless of body content.
    fn check(resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            Err(Error::Status {
                status,
                url: resp.url().to_string(),
            })
        }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!(%url, "GET");
        let resp = Self::check(self.http.get(&url).send()?)?;
        Ok(resp.json()?)
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.url(path);
        debug!(%url, "POST");
        let resp = Self::check(self.http.post(&url).json(body).send()?)?;
        Ok(resp.json()?)
    }

    fn post_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let url = self.url(path);
        debug!(%url, "POST");
        Self::check(self.http.post(&url).json(body).send()?)?;
        Ok(())
    }

    fn patch_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.url(path);
        debug!(%url, "PATCH");
        let resp = Self::check(self.http.patch(&url).json(body).send()?)?;
        Ok(resp.json()?)
    }

    fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path);
        debug!(%url, "DELETE");
        Self::check(self.http.delete(&url).send()?)?;
        Ok(())
    }

    // ==========================================
    // Clients
    // ==========================================

    pub fn clients(&self, insurance_type: InsuranceType) -> Result<Vec<Client>> {
        self.get_json(&format!("/clients/?insurance_type={insurance_type}"))
    }

    pub fn client_detail(&self, client_id: u64) -> Result<ClientDetail> {
        self.get_json(&format!("/clients/{client_id}/"))
    }

    pub fn client_history(&self, client_id: u64) -> Result<Vec<Note>> {
        self.get_json(&format!("/clients/{client_id}/history/"))
    }

    fn create_client(&self, req: &ClientCreateRequest) -> Result<Client> {
        self.post_json("/clients/", req)
    }

    pub fn update_client(&self, client_id: u64, req: &ClientUpdateRequest) -> Result<Client> {
        self.patch_json(&format!("/clients/{client_id}/"), req)
    }

    /// Plain delete, used as the compensating action for partial creation.
    fn delete_client(&self, client_id: u64) -> Result<()> {
        self.delete(&format!("/clients/{client_id}/"))
    }

    /// Cascading delete: notes, quotes, documents and the detail record go
    /// with the client.
    pub fn delete_client_full(&self, client_id: u64) -> Result<()> {
        self.delete(&format!("/clients/{client_id}/full-delete/"))
    }

    // ==========================================
    // Composite creation
    // ==========================================
    //
    // The client and its detail record are two sequential calls with no
    // transactional guarantee on the server. If the detail call fails we
    // delete the freshly created client so no orphan is left behind; only
    // when that rollback also fails does the operator get a PartialCreation
    // error naming the orphan.

    pub fn create_client_with_vehicle(
        &self,
        client: &ClientCreateRequest,
        mut detail: VehicleCreateRequest,
    ) -> Result<Client> {
        let created = self.create_client(client)?;
        detail.client = created.id;
        if let Err(cause) = self.create_vehicle_detail(&detail) {
            return Err(self.roll_back_client(created.id, cause));
        }
        Ok(created)
    }

    pub fn create_client_with_health(
        &self,
        client: &ClientCreateRequest,
        mut detail: HealthCreateRequest,
    ) -> Result<Client> {
        let created = self.create_client(client)?;
        detail.client = created.id;
        if let Err(cause) = self.create_health_detail(&detail) {
            return Err(self.roll_back_client(created.id, cause));
        }
        Ok(created)
    }

    fn roll_back_client(&self, client_id: u64, cause: Error) -> Error {
        match self.delete_client(client_id) {
            Ok(()) => cause,
            Err(_) => Error::PartialCreation { client_id },
        }
    }

    fn create_vehicle_detail(&self, req: &VehicleCreateRequest) -> Result<VehicleDetail> {
        self.post_json("/vehicle-insurance/", req)
    }

    fn create_health_detail(&self, req: &HealthCreateRequest) -> Result<HealthDetail> {
        self.post_json("/health-insurance/", req)
    }

    // ==========================================
    // Notes
    // ==========================================

    pub fn create_note(&self, req: &NoteCreateRequest) -> Result<Note> {
        self.post_json("/notes/", req)
    }

    pub fn update_note_text(&self, note_id: u64, text: String) -> Result<Note> {
        self.patch_json(&format!("/notes/{note_id}/"), &NoteTextPatch { text })
    }

    pub fn delete_note(&self, note_id: u64) -> Result<()> {
        self.delete(&format!("/notes/{note_id}/"))
    }

    pub fn complete_note(&self, note_id: u64) -> Result<()> {
        let url = self.url(&format!("/notes/{note_id}/complete/"));
        debug!(%url, "POST");
        Self::check(self.http.post(&url).send()?)?;
        Ok(())
    }

    pub fn notes_today(&self) -> Result<Vec<Note>> {
        self.get_json("/notes/today/")
    }

    pub fn notes_overdue(&self) -> Result<Vec<Note>> {
        self.get_json("/notes/overdue/")
    }

    pub fn notes_upcoming(&self) -> Result<Vec<Note>> {
        self.get_json("/notes/upcoming/")
    }

    pub fn notes_summary(&self) -> Result<NotesSummary> {
        self.get_json("/notes/summary/")
    }

    // ==========================================
    // Quotes & documents
    // ==========================================

    pub fn create_quote(&self, req: &QuoteCreateRequest) -> Result<Quote> {
        self.post_json("/quotes/", req)
    }

    pub fn documents(&self, client_id: u64) -> Result<Vec<Document>> {
        self.get_json(&format!("/documents/?client={client_id}"))
    }

    pub fn upload_document(
        &self,
        client_id: u64,
        document_type: DocumentType,
        file: &Path,
    ) -> Result<Document> {
        let url = self.url("/documents/");
        debug!(%url, "POST multipart");
        let form = multipart::Form::new()
            .text("client", client_id.to_string())
            .text("document_type", document_type.to_string())
            .file("file", file)?;
        let resp = Self::check(self.http.post(&url).multipart(form).send()?)?;
        Ok(resp.json()?)
    }

    pub fn delete_document(&self, document_id: u64) -> Result<()> {
        self.delete(&format!("/documents/{document_id}/delete/"))
    }

    // ==========================================
    // Renewals & conversion
    // ==========================================

    /// Overwrite the stored renewal date unconditionally. Any valid date is
    /// accepted; the call is idempotent. On failure nothing local changes.
    pub fn renew(
        &self,
        kind: InsuranceType,
        client_id: u64,
        next_renewal_date: NaiveDate,
    ) -> Result<()> {
        self.post_unit(
            &format!("/renewals/{kind}/{client_id}/renew/"),
            &RenewRequest { next_renewal_date },
        )
        .map_err(|source| Error::RenewalUpdate {
            client_id,
            source: Box::new(source),
        })
    }

    /// Set an initial renewal date on a vehicle record that has none.
    pub fn set_vehicle_renewal(&self, client_id: u64, renewal_date: NaiveDate) -> Result<()> {
        self.post_unit(
            &format!("/renewals/vehicle/{client_id}/set/"),
            &SetRenewalRequest { renewal_date },
        )
        .map_err(|source| Error::RenewalUpdate {
            client_id,
            source: Box::new(source),
        })
    }

    pub fn convert(&self, client_id: u64, req: &ConvertRequest) -> Result<ConversionRecord> {
        self.post_json(&format!("/convert-client/{client_id}/"), req)
    }
}
