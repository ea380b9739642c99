//! DynamoDB repository implementation.
//!
//! Implements `DataRepo` from `datarepo_core::storage` on a single table with
//! a string hash key and a string range key.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;

use datarepo_core::index::{IndexDescription, IndexRegistry};
use datarepo_core::keys::KEY_SEPARATOR;
use datarepo_core::object::DataObject;
use datarepo_core::storage::{DataRepo, GetResponse, ListResponse, Result, WriteResponse};

use crate::config::Config;

use super::conversions::{item_to_object, object_to_item};
use super::error::map_sdk_error;
use super::keys::{ddb_key_condition, ddb_keys, RangeCondition};

/// Table layout options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamoDbOptions {
    /// The name of the DynamoDB table where objects are stored.
    pub table_name: String,
    /// Separator used when joining key values into hash and range keys.
    pub key_separator: String,
    pub hash_key_name: String,
    pub range_key_name: String,
}

impl DynamoDbOptions {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            key_separator: KEY_SEPARATOR.to_string(),
            hash_key_name: "hashKey".to_string(),
            range_key_name: "rangeKey".to_string(),
        }
    }
}

impl From<&Config> for DynamoDbOptions {
    fn from(config: &Config) -> Self {
        Self {
            table_name: config.table_name.clone(),
            key_separator: config.key_separator.clone(),
            hash_key_name: config.hash_key_name.clone(),
            range_key_name: config.range_key_name.clone(),
        }
    }
}

/// DynamoDB-based repository implementation.
pub struct DynamoDbDataRepo {
    client: Client,
    options: DynamoDbOptions,
    registry: IndexRegistry,
}

impl DynamoDbDataRepo {
    /// Creates a new repository with the given DynamoDB client and options.
    pub fn new(client: Client, options: DynamoDbOptions) -> Self {
        Self {
            client,
            options,
            registry: IndexRegistry::new(),
        }
    }

    /// Creates a new repository from environment configuration.
    ///
    /// Uses the AWS SDK default credential chain and [`Config::from_env`]
    /// for the table layout.
    pub async fn from_env() -> Result<Self> {
        let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = Client::new(&sdk_config);
        let options = DynamoDbOptions::from(&Config::from_env());

        Ok(Self::new(client, options))
    }

    pub fn options(&self) -> &DynamoDbOptions {
        &self.options
    }

    fn to_object(&self, item: &super::conversions::Item) -> Result<DataObject> {
        item_to_object(
            item,
            &self.options.hash_key_name,
            &self.options.range_key_name,
        )
    }
}

#[async_trait]
impl DataRepo for DynamoDbDataRepo {
    fn provide_index(&mut self, index: IndexDescription) {
        let resolved = self.registry.provide_index(index);
        tracing::debug!(
            table = %self.options.table_name,
            index = %resolved.index_name,
            primary = resolved.is_primary,
            "Registered index"
        );
    }

    async fn get_object(&self, template: &DataObject) -> Result<GetResponse> {
        let index = self.registry.first_primary_index()?;
        let keys = self.registry.primary_keys(template)?;
        let ddb_keys = ddb_keys(index, &keys, &self.options.key_separator)?;

        let result = self
            .client
            .get_item()
            .table_name(&self.options.table_name)
            .key(
                &self.options.hash_key_name,
                AttributeValue::S(ddb_keys.hash_key.clone()),
            )
            .key(
                &self.options.range_key_name,
                AttributeValue::S(ddb_keys.range_key.clone()),
            )
            .send()
            .await
            .map_err(|e| map_sdk_error(e, "GetItem", &ddb_keys.hash_key))?;

        let found = result.item.as_ref().map(|item| self.to_object(item)).transpose()?;
        tracing::debug!(hash_key = %ddb_keys.hash_key, found = found.is_some(), "Looked up object");
        Ok(GetResponse::from_option(found))
    }

    async fn put_object(&self, object: DataObject) -> Result<WriteResponse> {
        let index = self.registry.first_primary_index()?;
        let keys = self.registry.primary_keys(&object)?;
        let ddb_keys = ddb_keys(index, &keys, &self.options.key_separator)?;
        let item = object_to_item(
            &object,
            &ddb_keys,
            &self.options.hash_key_name,
            &self.options.range_key_name,
        )?;

        let result = self
            .client
            .put_item()
            .table_name(&self.options.table_name)
            .set_item(Some(item))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, "PutItem", &ddb_keys.hash_key))?;

        if result.attributes.is_some() {
            tracing::debug!(hash_key = %ddb_keys.hash_key, "Updated object");
            Ok(WriteResponse::updated(object))
        } else {
            tracing::debug!(hash_key = %ddb_keys.hash_key, "Created object");
            Ok(WriteResponse::created(object))
        }
    }

    async fn put_objects(&self, objects: Vec<DataObject>) -> Result<Vec<WriteResponse>> {
        let mut responses = Vec::with_capacity(objects.len());
        for object in objects {
            responses.push(self.put_object(object).await?);
        }
        Ok(responses)
    }

    async fn list_objects(&self, template: &DataObject) -> Result<ListResponse> {
        let index = self.registry.first_primary_index()?;
        let keys = self.registry.primary_prefix_keys(template)?;
        let condition = ddb_key_condition(index, &keys, &self.options.key_separator)?;

        let mut query = self
            .client
            .query()
            .table_name(&self.options.table_name)
            .expression_attribute_names("#hk", &self.options.hash_key_name)
            .expression_attribute_values(":hk", AttributeValue::S(condition.hash_key.clone()));

        query = match &condition.range {
            RangeCondition::Any => query.key_condition_expression("#hk = :hk"),
            RangeCondition::Equals(range_key) => query
                .key_condition_expression("#hk = :hk AND #rk = :rk")
                .expression_attribute_names("#rk", &self.options.range_key_name)
                .expression_attribute_values(":rk", AttributeValue::S(range_key.clone())),
            RangeCondition::BeginsWith(prefix) => query
                .key_condition_expression("#hk = :hk AND begins_with(#rk, :rk)")
                .expression_attribute_names("#rk", &self.options.range_key_name)
                .expression_attribute_values(":rk", AttributeValue::S(prefix.clone())),
        };

        let result = query
            .send()
            .await
            .map_err(|e| map_sdk_error(e, "Query", &condition.hash_key))?;

        let has_more = result.last_evaluated_key.is_some();
        let objects = result
            .items
            .unwrap_or_default()
            .iter()
            .map(|item| self.to_object(item))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            hash_key = %condition.hash_key,
            count = objects.len(),
            has_more,
            "Listed objects"
        );
        if has_more {
            tracing::warn!(
                hash_key = %condition.hash_key,
                "Query result truncated to the first page"
            );
        }

        let next = match (has_more, objects.last()) {
            (true, Some(last)) => Some(self.registry.primary_keys(last)?),
            _ => None,
        };

        let response = ListResponse::from_records(objects);
        Ok(match next {
            Some(next) => response.with_next(next),
            None => response,
        })
    }
}
