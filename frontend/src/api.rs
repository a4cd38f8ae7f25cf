use gloo_file::File as GlooFile;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use session::{ChatApi, ClientError, LocalImage, MonitorApi};
use shared::{endpoints, fields, ChatReply, Detection, ProgressSnapshot, UploadAck, UploadConfig};
use wasm_bindgen::JsValue;
use web_sys::FormData;

fn js_error(err: JsValue) -> ClientError {
    ClientError::Transport(format!("{:?}", err))
}

fn transport_error(err: gloo_net::Error) -> ClientError {
    ClientError::Transport(err.to_string())
}

fn blob_of(file: &GlooFile) -> &web_sys::Blob {
    let blob: &gloo_file::Blob = file;
    blob.as_ref()
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    if !response.ok() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Status { status, body });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}

async fn post_form<T: DeserializeOwned>(url: &str, form: FormData) -> Result<T, ClientError> {
    let response = Request::post(url)
        .body(form)
        .map_err(transport_error)?
        .send()
        .await
        .map_err(transport_error)?;
    read_json(response).await
}

async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, ClientError> {
    let response = Request::get(url).send().await.map_err(transport_error)?;
    read_json(response).await
}

/// gloo-net client for the video monitoring backend.
pub struct HttpMonitorApi {
    base_url: String,
    detections_limit: Option<u32>,
}

impl HttpMonitorApi {
    pub fn new(base_url: impl Into<String>, detections_limit: Option<u32>) -> Self {
        Self {
            base_url: base_url.into(),
            detections_limit,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl MonitorApi for HttpMonitorApi {
    type Video = GlooFile;

    async fn upload_video(
        &self,
        video: GlooFile,
        config: UploadConfig,
    ) -> Result<UploadAck, ClientError> {
        let form = FormData::new().map_err(js_error)?;
        form.append_with_blob_and_filename(fields::VIDEO, blob_of(&video), &video.name())
            .map_err(js_error)?;
        for (name, value) in config.form_fields() {
            form.append_with_str(name, &value).map_err(js_error)?;
        }

        post_form(&self.url(endpoints::UPLOAD_VIDEO), form).await
    }

    async fn fetch_progress(&self) -> Result<ProgressSnapshot, ClientError> {
        get_json(&self.url(endpoints::MONITORING_PROGRESS)).await
    }

    async fn fetch_detections(&self) -> Result<Vec<Detection>, ClientError> {
        let mut url = self.url(endpoints::MONITORING_DETECTIONS);
        if let Some(limit) = self.detections_limit {
            url.push_str(&format!("?limit={}", limit));
        }
        get_json(&url).await
    }
}

/// An image picked in the chat widget.
pub struct BrowserImage(pub GlooFile);

impl LocalImage for BrowserImage {
    fn name(&self) -> String {
        self.0.name()
    }

    async fn preview(&self) -> Result<String, ClientError> {
        gloo_file::futures::read_as_data_url(&self.0)
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

/// gloo-net client for the chatbot backend.
pub struct HttpChatApi {
    base_url: String,
}

impl HttpChatApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, endpoints::CHAT)
    }
}

impl ChatApi for HttpChatApi {
    type Image = BrowserImage;

    async fn send_turn(
        &self,
        message: &str,
        image: Option<BrowserImage>,
    ) -> Result<ChatReply, ClientError> {
        let form = FormData::new().map_err(js_error)?;
        form.append_with_str(fields::MESSAGE, message)
            .map_err(js_error)?;
        if let Some(BrowserImage(file)) = &image {
            form.append_with_blob_and_filename(fields::IMAGE, blob_of(file), &file.name())
                .map_err(js_error)?;
        }

        post_form(&self.endpoint(), form).await
    }
}
