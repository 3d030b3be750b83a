use async_trait::async_trait;
use emolabel_core::CredentialSource;
use emolabel_core::constants::DEFAULT_HTTP_TIMEOUT_SECS;
use emolabel_core::env_config::env_parse_with_default;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::api::{SpreadsheetApi, ValueInputOption, WorksheetInfo, WorksheetRef, column_letters, quote_title};
use crate::api_types::{
    BatchUpdateRequest, BatchUpdateResponse, Dimension, DimensionRange, GridProperties, Request,
    SheetProperties, SpreadsheetMeta, ValueRange, cell_text,
};
use crate::auth::{ServiceAccountAuth, TokenSource};
use crate::credentials::ServiceAccountKey;
use crate::error::SheetsError;

/// Production Sheets API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

/// Client for the Google Sheets v4 REST API.
///
/// Every call is a single attempt; failures are returned to the caller.
pub struct SheetsClient {
    http: reqwest::Client,
    base_url: String,
    auth: TokenSource,
}

impl std::fmt::Debug for SheetsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsClient")
            .field("base_url", &self.base_url)
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

impl SheetsClient {
    /// Creates a client using `auth` for bearer tokens.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(auth: TokenSource) -> Result<Self, SheetsError> {
        Ok(Self { http: build_http()?, base_url: DEFAULT_BASE_URL.to_owned(), auth })
    }

    /// Creates a client authenticated as the service account in `source`.
    ///
    /// # Errors
    /// Returns [`SheetsError::Credentials`] if the key cannot be loaded.
    pub fn from_credentials(source: &CredentialSource) -> Result<Self, SheetsError> {
        let key = ServiceAccountKey::from_source(source)?;
        tracing::info!(client_email = %key.client_email, "using service account");
        let http = build_http()?;
        let auth = TokenSource::ServiceAccount(ServiceAccountAuth::new(key, http.clone()));
        Ok(Self { http, base_url: DEFAULT_BASE_URL.to_owned(), auth })
    }

    /// Points the client at another API host.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> Result<reqwest::Url, SheetsError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| SheetsError::ClientInit(format!("invalid base url {}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| SheetsError::ClientInit(format!("base url cannot have a path: {}", self.base_url)))?
            .pop_if_empty()
            .push("v4")
            .push("spreadsheets")
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, SheetsError> {
        let token = self.auth.bearer().await?;
        let response = request.bearer_auth(token).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SheetsError::HttpStatus { code: status.as_u16(), body });
        }
        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        context: &str,
    ) -> Result<T, SheetsError> {
        let body = self.send(request).await?;
        serde_json::from_str(&body).map_err(|e| SheetsError::JsonParse {
            context: format!("{context} (body: {})", truncate(&body, 200)),
            source: e,
        })
    }

    async fn batch_update(
        &self,
        spreadsheet_id: &str,
        requests: Vec<Request>,
    ) -> Result<BatchUpdateResponse, SheetsError> {
        let action = format!("{spreadsheet_id}:batchUpdate");
        let url = self.url(&[action.as_str()])?;
        let body = BatchUpdateRequest { requests };
        self.send_json(self.http.post(url).json(&body), "batchUpdate response").await
    }

    async fn get_values(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<String>>, SheetsError> {
        let url = self.url(&[spreadsheet_id, "values", range])?;
        let values: ValueRange = self.send_json(self.http.get(url), "values response").await?;
        Ok(values.values.iter().map(|row| row.iter().map(cell_text).collect()).collect())
    }

    async fn put_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: &[String],
        input: ValueInputOption,
    ) -> Result<(), SheetsError> {
        let url = self.url(&[spreadsheet_id, "values", range])?;
        let body = row_body(Some(range), values);
        self.send(self.http.put(url).query(&[("valueInputOption", input.as_str())]).json(&body))
            .await?;
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RowBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    range: Option<&'a str>,
    major_dimension: &'static str,
    values: [&'a [String]; 1],
}

fn row_body<'a>(range: Option<&'a str>, values: &'a [String]) -> RowBody<'a> {
    RowBody { range, major_dimension: "ROWS", values: [values] }
}

fn build_http() -> Result<reqwest::Client, SheetsError> {
    let timeout = env_parse_with_default("EMOLABEL_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS);
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout))
        .build()
        .map_err(|e| SheetsError::ClientInit(e.to_string()))
}

fn to_info(spreadsheet_id: &str, props: SheetProperties) -> WorksheetInfo {
    WorksheetInfo {
        worksheet: WorksheetRef {
            spreadsheet_id: spreadsheet_id.to_owned(),
            sheet_id: props.sheet_id.unwrap_or_default(),
            title: props.title,
        },
        row_count: props.grid_properties.row_count,
        column_count: props.grid_properties.column_count,
    }
}

#[async_trait]
impl SpreadsheetApi for SheetsClient {
    async fn find_worksheet(
        &self,
        spreadsheet_id: &str,
        title: &str,
    ) -> Result<Option<WorksheetInfo>, SheetsError> {
        let mut url = self.url(&[spreadsheet_id])?;
        url.query_pairs_mut().append_pair("fields", "sheets.properties");
        let meta: SpreadsheetMeta = self.send_json(self.http.get(url), "spreadsheet metadata").await?;
        Ok(meta
            .sheets
            .into_iter()
            .map(|entry| entry.properties)
            .find(|props| props.title == title)
            .map(|props| to_info(spreadsheet_id, props)))
    }

    async fn add_worksheet(
        &self,
        spreadsheet_id: &str,
        title: &str,
        rows: u32,
        columns: u32,
    ) -> Result<WorksheetInfo, SheetsError> {
        let properties = SheetProperties {
            sheet_id: None,
            title: title.to_owned(),
            grid_properties: GridProperties { row_count: rows, column_count: columns },
        };
        let response = self.batch_update(spreadsheet_id, vec![Request::AddSheet { properties }]).await?;
        tracing::info!(spreadsheet_id, title, rows, columns, "created worksheet");
        let added = response.replies.into_iter().find_map(|reply| reply.add_sheet);
        match added {
            Some(reply) => Ok(to_info(spreadsheet_id, reply.properties)),
            None => self
                .find_worksheet(spreadsheet_id, title)
                .await?
                .ok_or_else(|| SheetsError::WorksheetNotFound(title.to_owned())),
        }
    }

    async fn add_rows(&self, worksheet: &WorksheetRef, count: u32) -> Result<(), SheetsError> {
        let request =
            Request::AppendDimension { sheet_id: worksheet.sheet_id, dimension: Dimension::Rows, length: count };
        self.batch_update(&worksheet.spreadsheet_id, vec![request]).await?;
        Ok(())
    }

    async fn add_columns(&self, worksheet: &WorksheetRef, count: u32) -> Result<(), SheetsError> {
        let request = Request::AppendDimension {
            sheet_id: worksheet.sheet_id,
            dimension: Dimension::Columns,
            length: count,
        };
        self.batch_update(&worksheet.spreadsheet_id, vec![request]).await?;
        Ok(())
    }

    async fn delete_column(&self, worksheet: &WorksheetRef, column: u32) -> Result<(), SheetsError> {
        let range = DimensionRange {
            sheet_id: worksheet.sheet_id,
            dimension: Dimension::Columns,
            start_index: column.saturating_sub(1),
            end_index: column,
        };
        self.batch_update(&worksheet.spreadsheet_id, vec![Request::DeleteDimension { range }]).await?;
        Ok(())
    }

    async fn read_row(&self, worksheet: &WorksheetRef, row: u32) -> Result<Vec<String>, SheetsError> {
        let range = format!("{}!{row}:{row}", quote_title(&worksheet.title));
        let rows = self.get_values(&worksheet.spreadsheet_id, &range).await?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }

    async fn update_cell(
        &self,
        worksheet: &WorksheetRef,
        row: u32,
        column: u32,
        value: &str,
    ) -> Result<(), SheetsError> {
        let range = format!("{}!{}{row}", quote_title(&worksheet.title), column_letters(column));
        self.put_values(
            &worksheet.spreadsheet_id,
            &range,
            &[value.to_owned()],
            ValueInputOption::UserEntered,
        )
        .await
    }

    async fn write_row(
        &self,
        worksheet: &WorksheetRef,
        row: u32,
        values: &[String],
    ) -> Result<(), SheetsError> {
        let range = format!("{}!A{row}", quote_title(&worksheet.title));
        self.put_values(&worksheet.spreadsheet_id, &range, values, ValueInputOption::Raw).await
    }

    async fn append_row(
        &self,
        worksheet: &WorksheetRef,
        values: &[String],
        input: ValueInputOption,
    ) -> Result<(), SheetsError> {
        let action = format!("{}:append", quote_title(&worksheet.title));
        let url = self.url(&[worksheet.spreadsheet_id.as_str(), "values", action.as_str()])?;
        let body = row_body(None, values);
        self.send(self.http.post(url).query(&[("valueInputOption", input.as_str())]).json(&body))
            .await?;
        tracing::debug!(worksheet = %worksheet.title, cells = values.len(), "appended row");
        Ok(())
    }

    async fn read_all_values(&self, worksheet: &WorksheetRef) -> Result<Vec<Vec<String>>, SheetsError> {
        self.get_values(&worksheet.spreadsheet_id, &quote_title(&worksheet.title)).await
    }
}

/// Truncates a string to the given maximum length at a char boundary.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end = end.saturating_sub(1);
        }
        s.get(..end).unwrap_or("")
    }
}
