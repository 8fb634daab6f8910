use async_trait::async_trait;
use database_traits::{
    Document, DocumentCollection, SharedCollection, StoreError,
    dao::GenericDao,
};
use tracing::instrument;
use user_errors::UserError;
use user_models::User;
use uuid::Uuid;

#[derive(Clone)]
pub struct UserDao {
    collection: SharedCollection,
}

impl UserDao {
    pub fn new(collection: SharedCollection) -> Self { Self { collection } }

    pub fn collection(&self) -> &SharedCollection { &self.collection }

    fn generate_id() -> String { Uuid::new_v4().to_string() }

    fn to_content(user: &User) -> Result<serde_json::Value, UserError> {
        serde_json::to_value(user)
            .map_err(|err| UserError::Store(StoreError::Serialization(err)))
    }
}

#[async_trait]
impl GenericDao for UserDao {
    type CreateRequest = String;
    type Error = UserError;
    type ID = String;
    type Model = User;
    type Response = User;
    type UpdateRequest = String;

    #[instrument(skip(self))]
    async fn find_by_id(
        &self, id: Self::ID,
    ) -> Result<Self::Response, Self::Error> {
        let document = self
            .collection
            .get(&id)
            .await
            .map_err(|err| UserError::from_store(&id, err))?;

        self.map_document(&document)
    }

    #[instrument(skip(self))]
    async fn all(&self) -> Result<Vec<Self::Response>, Self::Error> {
        let documents = self.collection.scan().await?;

        documents
            .iter()
            .map(|document| self.map_document(document))
            .collect()
    }

    #[instrument(skip(self))]
    async fn create(
        &self, name: Self::CreateRequest,
    ) -> Result<Self::Response, Self::Error> {
        let user = User::new(Self::generate_id(), name);

        self.collection
            .insert(&user.id, Self::to_content(&user)?)
            .await
            .map_err(|err| {
                match err {
                    StoreError::DocumentExists { key } => {
                        UserError::IdCollision { user_id: key }
                    }
                    other => UserError::Store(other),
                }
            })?;

        tracing::debug!(user_id = %user.id, "Inserted user document");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn update(
        &self, id: Self::ID, name: Self::UpdateRequest,
    ) -> Result<Self::Response, Self::Error> {
        let user = User::new(id, name);

        self.collection
            .replace(&user.id, Self::to_content(&user)?)
            .await
            .map_err(|err| UserError::from_store(&user.id, err))?;

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn delete(
        &self, id: Self::ID,
    ) -> Result<Self::Response, Self::Error> {
        let document = self
            .collection
            .remove(&id)
            .await
            .map_err(|err| UserError::from_store(&id, err))?;

        self.map_document(&document)
    }

    #[instrument(skip(self))]
    async fn count(&self) -> Result<u64, Self::Error> {
        Ok(self.collection.count().await?)
    }

    fn map_document(
        &self, document: &Document,
    ) -> Result<Self::Model, Self::Error> {
        let mut user: User = document.content_as()?;
        // The document key is authoritative for the id.
        user.id.clone_from(&document.key);
        Ok(user)
    }
}
