//! Material endpoints.

use crate::client::ApiClient;
use crate::image::ImageUpload;
use crate::{ApiError, ApiResult, MATERIALS_PATH, MY_MATERIALS_PATH, STATS_PATH};
use labora_core::{Material, MaterialStats, SessionContext, ValidatedForm};
use reqwest::multipart::Form;

const NOT_FOUND: &str = "Data tidak ditemukan";

impl ApiClient {
    /// Every material visible to the signed-in user.
    pub async fn list_materials(&self, session: &SessionContext) -> ApiResult<Vec<Material>> {
        let request = self.authorized(self.http().get(self.endpoint(MATERIALS_PATH)), session)?;
        let materials: Vec<Material> = self
            .fetch("list materials", "Gagal memuat material", request)
            .await?
            .unwrap_or_default();
        tracing::debug!(count = materials.len(), "fetched materials");
        Ok(materials)
    }

    /// Materials created by the signed-in user.
    pub async fn my_materials(&self, session: &SessionContext) -> ApiResult<Vec<Material>> {
        let request =
            self.authorized(self.http().get(self.endpoint(MY_MATERIALS_PATH)), session)?;
        Ok(self
            .fetch("my materials", "Gagal memuat material", request)
            .await?
            .unwrap_or_default())
    }

    pub async fn material_stats(&self, session: &SessionContext) -> ApiResult<MaterialStats> {
        let request = self.authorized(self.http().get(self.endpoint(STATS_PATH)), session)?;
        Ok(self
            .fetch("material stats", "Gagal memuat statistik", request)
            .await?
            .unwrap_or_default())
    }

    /// One material by id. A null `data` is reported as not found.
    pub async fn get_material(&self, session: &SessionContext, id: &str) -> ApiResult<Material> {
        let url = self.endpoint_with_segment(MATERIALS_PATH, id)?;
        let request = self.authorized(self.http().get(url), session)?;
        self.fetch("get material", NOT_FOUND, request)
            .await?
            .ok_or(ApiError::MissingData(NOT_FOUND))
    }

    pub async fn create_material(
        &self,
        session: &SessionContext,
        form: &ValidatedForm,
        image: Option<ImageUpload>,
    ) -> ApiResult<()> {
        let multipart = multipart_form(form, image)?;
        let request = self.authorized(
            self.http().post(self.endpoint(MATERIALS_PATH)).multipart(multipart),
            session,
        )?;
        self.send("create material", "Gagal menyimpan material", request)
            .await?;
        tracing::info!(name = %form.name, "material created");
        Ok(())
    }

    /// Replaces a material. Without a new image the stored one is kept.
    pub async fn update_material(
        &self,
        session: &SessionContext,
        id: &str,
        form: &ValidatedForm,
        image: Option<ImageUpload>,
    ) -> ApiResult<()> {
        let url = self.endpoint_with_segment(MATERIALS_PATH, id)?;
        let multipart = multipart_form(form, image)?;
        let request = self.authorized(self.http().put(url).multipart(multipart), session)?;
        self.send("update material", "Gagal memperbarui material", request)
            .await?;
        tracing::info!(material_id = id, "material updated");
        Ok(())
    }

    pub async fn delete_material(&self, session: &SessionContext, id: &str) -> ApiResult<()> {
        let url = self.endpoint_with_segment(MATERIALS_PATH, id)?;
        let request = self.authorized(self.http().delete(url), session)?;
        self.send("delete material", "Gagal menghapus material", request)
            .await?;
        tracing::info!(material_id = id, "material deleted");
        Ok(())
    }
}

fn multipart_form(form: &ValidatedForm, image: Option<ImageUpload>) -> ApiResult<Form> {
    let mut multipart = form
        .fields()
        .into_iter()
        .fold(Form::new(), |multipart, (key, value)| multipart.text(key, value));
    if let Some(image) = image {
        multipart = multipart.part("image", image.into_part()?);
    }
    Ok(multipart)
}
