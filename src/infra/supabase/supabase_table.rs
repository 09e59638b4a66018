use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};

use crate::core::events::{EventRecord, EventStore, LiveEventRow};
use crate::core::records::{Record, RecordStore, StoreError};

/// Tell PostgREST to merge on the primary key and echo the stored rows back.
const UPSERT_PREFERENCE: &str = "resolution=merge-duplicates,return=representation";

/// Skip rows whose key already exists; only inserted rows are echoed back.
const INSERT_IF_ABSENT_PREFERENCE: &str = "resolution=ignore-duplicates,return=representation";

/// One Supabase table accessed through its PostgREST endpoint.
///
/// The row type decides how rows are (de)serialized; the table itself only
/// knows its URL. Cloning is cheap and shares the underlying HTTP client.
pub struct SupabaseTable<R: Record> {
    client: Client,
    endpoint: String,
    table: String,
    _rows: PhantomData<fn() -> R>,
}

impl<R: Record> Clone for SupabaseTable<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            endpoint: self.endpoint.clone(),
            table: self.table.clone(),
            _rows: PhantomData,
        }
    }
}

impl<R: Record> SupabaseTable<R> {
    pub fn new(api_url: &str, api_key: &str, table: &str) -> Result<Self, StoreError> {
        let client = Client::builder()
            .default_headers(auth_headers(api_key)?)
            .build()?;

        Ok(Self {
            client,
            endpoint: rest_endpoint(api_url, table),
            table: table.to_string(),
            _rows: PhantomData,
        })
    }

    /// Share an existing HTTP client (and its connection pool) with another table.
    pub fn sibling<T: Record>(&self, api_url: &str, table: &str) -> SupabaseTable<T> {
        SupabaseTable {
            client: self.client.clone(),
            endpoint: rest_endpoint(api_url, table),
            table: table.to_string(),
            _rows: PhantomData,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    async fn read_rows(response: Response) -> Result<Vec<R>, StoreError> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        decode_rows(status, &body)
    }

    async fn checked_body(response: Response) -> Result<String, StoreError> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        check_status(status, body)
    }
}

#[async_trait]
impl<R: Record> RecordStore<R> for SupabaseTable<R> {
    async fn upsert(&self, record: &R) -> Result<R, StoreError> {
        record.validate()?;

        let response = self
            .client
            .post(&self.endpoint)
            .header("Prefer", UPSERT_PREFERENCE)
            .json(&[record])
            .send()
            .await?;

        let stored = first_row(Self::read_rows(response).await?)?;

        tracing::debug!(table = %self.table, id = stored.id(), "Upserted row");
        Ok(stored)
    }

    async fn get(&self, id: &str) -> Result<Option<R>, StoreError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("id", id_filter(id).as_str()), ("select", "*")])
            .send()
            .await?;

        let row = Self::read_rows(response).await?.into_iter().next();
        if row.is_none() {
            tracing::debug!(table = %self.table, id, "Row not found");
        }
        Ok(row)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(&self.endpoint)
            .query(&[("id", id_filter(id).as_str())])
            .send()
            .await?;

        Self::checked_body(response).await?;
        tracing::debug!(table = %self.table, id, "Deleted row");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<R>, StoreError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("select", "*")])
            .send()
            .await?;

        Self::read_rows(response).await
    }
}

#[async_trait]
impl EventStore for SupabaseTable<EventRecord> {
    async fn insert_if_absent(&self, record: &EventRecord) -> Result<bool, StoreError> {
        record.validate()?;

        let response = self
            .client
            .post(&self.endpoint)
            .header("Prefer", INSERT_IF_ABSENT_PREFERENCE)
            .json(&[record])
            .send()
            .await?;

        let inserted = !Self::read_rows(response).await?.is_empty();
        tracing::debug!(table = %self.table, id = %record.id, inserted, "Insert if absent");
        Ok(inserted)
    }

    async fn update_live_columns(&self, id: &str, row: &LiveEventRow) -> Result<(), StoreError> {
        let response = self
            .client
            .patch(&self.endpoint)
            .query(&[("id", id_filter(id).as_str())])
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;

        Self::checked_body(response).await?;
        tracing::debug!(table = %self.table, id, "Updated live columns");
        Ok(())
    }
}

/// Fail on non-success statuses, otherwise hand the body back.
fn check_status(status: u16, body: String) -> Result<String, StoreError> {
    if !(200..300).contains(&status) {
        return Err(StoreError::Status { status, body });
    }
    Ok(body)
}

/// Decode a PostgREST row array and validate every row in it.
fn decode_rows<R: Record>(status: u16, body: &str) -> Result<Vec<R>, StoreError> {
    let body = check_status(status, body.to_string())?;
    let rows: Vec<R> = serde_json::from_str(&body)?;
    for row in &rows {
        row.validate()?;
    }
    Ok(rows)
}

/// An upsert always echoes the stored row; an empty array means it did not.
fn first_row<R>(rows: Vec<R>) -> Result<R, StoreError> {
    rows.into_iter().next().ok_or(StoreError::EmptyResponse)
}

fn auth_headers(api_key: &str) -> Result<HeaderMap, StoreError> {
    let invalid = |e: reqwest::header::InvalidHeaderValue| StoreError::Config(e.to_string());

    let mut headers = HeaderMap::new();
    headers.insert("apikey", HeaderValue::from_str(api_key).map_err(invalid)?);
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(invalid)?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

fn rest_endpoint(api_url: &str, table: &str) -> String {
    format!("{}/rest/v1/{}", api_url.trim_end_matches('/'), table)
}

/// PostgREST equality filter on the primary key.
fn id_filter(id: &str) -> String {
    format!("eq.{}", id)
}
