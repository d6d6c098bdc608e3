//! Qdrant backend implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::vectors_config::Config as VectorsConfig;
use qdrant_client::qdrant::with_payload_selector::SelectorOptions;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, DeletePointsBuilder, Distance, Filter, PointId,
    PointStruct, SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
};
use uuid::Uuid;

use crate::TRACING_TARGET;
use crate::config::QdrantConfig;
use crate::error::{VectorError, VectorResult};
use crate::store::{ChunkFilter, ChunkPayload, ChunkRecord, ScoredChunk, VectorStoreBackend};

/// Qdrant backend implementation.
pub struct QdrantBackend {
    client: Qdrant,
    config: QdrantConfig,
}

impl QdrantBackend {
    /// Creates a new Qdrant backend, ensuring the chunk collection exists.
    pub async fn new(config: &QdrantConfig) -> VectorResult<Self> {
        let client = Qdrant::from_url(&config.url)
            .api_key(config.api_key.clone())
            .build()
            .map_err(|e| VectorError::connection(e.to_string()))?;

        let backend = Self {
            client,
            config: config.clone(),
        };
        backend.ensure_collection().await?;

        tracing::debug!(
            target: TRACING_TARGET,
            url = %config.url,
            collection = %config.collection,
            "Connected to Qdrant"
        );

        Ok(backend)
    }

    async fn ensure_collection(&self) -> VectorResult<()> {
        let exists = self
            .client
            .collection_exists(&self.config.collection)
            .await
            .map_err(|e| VectorError::backend(e.to_string()))?;

        if !exists {
            let vectors_config = VectorsConfig::Params(
                VectorParamsBuilder::new(self.config.dimensions as u64, Distance::Cosine).build(),
            );

            self.client
                .create_collection(
                    CreateCollectionBuilder::new(&self.config.collection)
                        .vectors_config(vectors_config),
                )
                .await
                .map_err(|e| VectorError::backend(e.to_string()))?;

            tracing::info!(
                target: TRACING_TARGET,
                collection = %self.config.collection,
                dimensions = %self.config.dimensions,
                "Created Qdrant collection"
            );
        }

        Ok(())
    }

    /// Extracts a point id as a Uuid.
    fn extract_point_id(id: Option<PointId>) -> Option<Uuid> {
        use qdrant_client::qdrant::point_id::PointIdOptions;

        match id {
            Some(PointId {
                point_id_options: Some(PointIdOptions::Uuid(s)),
            }) => Uuid::parse_str(&s).ok(),
            _ => None,
        }
    }

    fn payload_to_qdrant(
        payload: &ChunkPayload,
    ) -> VectorResult<HashMap<String, qdrant_client::qdrant::Value>> {
        let json = serde_json::to_value(payload)?;
        let serde_json::Value::Object(map) = json else {
            return Err(VectorError::serialization("chunk payload is not an object"));
        };

        Ok(map
            .into_iter()
            .map(|(k, v)| (k, json_to_qdrant_value(v)))
            .collect())
    }

    fn payload_from_qdrant(
        payload: HashMap<String, qdrant_client::qdrant::Value>,
    ) -> VectorResult<ChunkPayload> {
        let map: serde_json::Map<String, serde_json::Value> = payload
            .into_iter()
            .map(|(k, v)| (k, qdrant_value_to_json(v)))
            .collect();

        Ok(serde_json::from_value(serde_json::Value::Object(map))?)
    }
}

#[async_trait]
impl VectorStoreBackend for QdrantBackend {
    async fn upsert(&self, records: Vec<ChunkRecord>) -> VectorResult<()> {
        if records.is_empty() {
            return Ok(());
        }

        if let Some(record) = records
            .iter()
            .find(|r| r.embedding.len() != self.config.dimensions)
        {
            return Err(VectorError::dimension_mismatch(
                self.config.dimensions,
                record.embedding.len(),
            ));
        }

        let points: Vec<PointStruct> = records
            .iter()
            .map(|record| {
                let payload = Self::payload_to_qdrant(&record.payload)?;
                Ok(PointStruct::new(
                    record.id.to_string(),
                    record.embedding.clone(),
                    payload,
                ))
            })
            .collect::<VectorResult<_>>()?;

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.config.collection, points))
            .await
            .map_err(|e| VectorError::backend(e.to_string()))?;

        Ok(())
    }

    async fn search(
        &self,
        query: Vec<f32>,
        filter: &ChunkFilter,
        limit: usize,
    ) -> VectorResult<Vec<ScoredChunk>> {
        let mut search = SearchPointsBuilder::new(&self.config.collection, query, limit as u64)
            .with_payload(SelectorOptions::Enable(true));

        if let Some(conditions) = build_filter(filter) {
            search = search.filter(conditions);
        }

        let response = self
            .client
            .search_points(search)
            .await
            .map_err(|e| VectorError::backend(e.to_string()))?;

        response
            .result
            .into_iter()
            .filter_map(|point| {
                let id = Self::extract_point_id(point.id)?;
                Some((id, point.score, point.payload))
            })
            .map(|(id, score, payload)| {
                Ok(ScoredChunk {
                    id,
                    similarity: score,
                    payload: Self::payload_from_qdrant(payload)?,
                })
            })
            .collect()
    }

    async fn delete_by_document(&self, document_id: Uuid) -> VectorResult<()> {
        let filter = Filter::must([Condition::matches(
            "document_id",
            document_id.to_string(),
        )]);

        self.client
            .delete_points(DeletePointsBuilder::new(&self.config.collection).points(filter))
            .await
            .map_err(|e| VectorError::backend(e.to_string()))?;

        Ok(())
    }

    async fn delete_by_canvas(&self, canvas_id: Uuid) -> VectorResult<()> {
        let filter = Filter::must([Condition::matches("canvas_id", canvas_id.to_string())]);

        self.client
            .delete_points(DeletePointsBuilder::new(&self.config.collection).points(filter))
            .await
            .map_err(|e| VectorError::backend(e.to_string()))?;

        Ok(())
    }
}

/// Translates a [`ChunkFilter`] into Qdrant must/should conditions.
///
/// Each clause is a should-group admitting the matching value or an absent
/// field, preserving the unscoped-chunk visibility semantics.
fn build_filter(filter: &ChunkFilter) -> Option<Filter> {
    let mut must: Vec<Condition> = Vec::new();

    if let Some(field_key) = &filter.field_key {
        must.push(Condition::from(Filter::should([
            Condition::matches("field_key", field_key.clone()),
            Condition::is_empty("field_key"),
        ])));
    }

    if let Some(document_ids) = &filter.document_ids {
        let mut should: Vec<Condition> = document_ids
            .iter()
            .map(|id| Condition::matches("document_id", id.to_string()))
            .collect();
        should.push(Condition::is_empty("canvas_id"));
        must.push(Condition::from(Filter::should(should)));
    } else if let Some(canvas_id) = &filter.canvas_id {
        must.push(Condition::from(Filter::should([
            Condition::matches("canvas_id", canvas_id.to_string()),
            Condition::is_empty("canvas_id"),
        ])));
    }

    if must.is_empty() {
        None
    } else {
        Some(Filter::must(must))
    }
}

/// Converts a JSON value to a Qdrant value.
fn json_to_qdrant_value(value: serde_json::Value) -> qdrant_client::qdrant::Value {
    use qdrant_client::qdrant::value::Kind;

    let kind = match value {
        serde_json::Value::Null => Kind::NullValue(0),
        serde_json::Value::Bool(b) => Kind::BoolValue(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Kind::IntegerValue(i)
            } else if let Some(f) = n.as_f64() {
                Kind::DoubleValue(f)
            } else {
                Kind::StringValue(n.to_string())
            }
        }
        serde_json::Value::String(s) => Kind::StringValue(s),
        serde_json::Value::Array(arr) => {
            let values: Vec<qdrant_client::qdrant::Value> =
                arr.into_iter().map(json_to_qdrant_value).collect();
            Kind::ListValue(qdrant_client::qdrant::ListValue { values })
        }
        serde_json::Value::Object(obj) => {
            let fields: HashMap<String, qdrant_client::qdrant::Value> = obj
                .into_iter()
                .map(|(k, v)| (k, json_to_qdrant_value(v)))
                .collect();
            Kind::StructValue(qdrant_client::qdrant::Struct { fields })
        }
    };

    qdrant_client::qdrant::Value { kind: Some(kind) }
}

/// Converts a Qdrant value to a JSON value.
fn qdrant_value_to_json(value: qdrant_client::qdrant::Value) -> serde_json::Value {
    use qdrant_client::qdrant::value::Kind;

    match value.kind {
        Some(Kind::NullValue(_)) => serde_json::Value::Null,
        Some(Kind::BoolValue(b)) => serde_json::Value::Bool(b),
        Some(Kind::IntegerValue(i)) => serde_json::json!(i),
        Some(Kind::DoubleValue(f)) => serde_json::json!(f),
        Some(Kind::StringValue(s)) => serde_json::Value::String(s),
        Some(Kind::ListValue(list)) => {
            let arr: Vec<serde_json::Value> =
                list.values.into_iter().map(qdrant_value_to_json).collect();
            serde_json::Value::Array(arr)
        }
        Some(Kind::StructValue(obj)) => {
            let map: serde_json::Map<String, serde_json::Value> = obj
                .fields
                .into_iter()
                .map(|(k, v)| (k, qdrant_value_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
        None => serde_json::Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_builds_nothing() {
        assert!(build_filter(&ChunkFilter::new()).is_none());
    }

    #[test]
    fn canvas_filter_builds_one_should_group() {
        let filter = ChunkFilter::new().with_canvas_id(Uuid::new_v4());
        let built = build_filter(&filter).unwrap();
        assert_eq!(built.must.len(), 1);
    }

    #[test]
    fn document_filter_suppresses_canvas_clause() {
        let filter = ChunkFilter::new()
            .with_document_ids(vec![Uuid::new_v4(), Uuid::new_v4()])
            .with_canvas_id(Uuid::new_v4());
        let built = build_filter(&filter).unwrap();
        // One should-group for the documents; the canvas clause is unused
        // when documents are explicitly selected.
        assert_eq!(built.must.len(), 1);
    }

    #[test]
    fn payload_round_trips_through_qdrant_values() {
        let payload = ChunkPayload {
            document_id: Uuid::new_v4(),
            canvas_id: Some(Uuid::new_v4()),
            field_key: None,
            content: "chunk text".to_owned(),
            token_count: 2,
            filename: "pitch.pdf".to_owned(),
            chunk_index: 4,
            total_chunks: 9,
        };

        let qdrant = QdrantBackend::payload_to_qdrant(&payload).unwrap();
        let back = QdrantBackend::payload_from_qdrant(qdrant).unwrap();
        assert_eq!(back, payload);
    }
}
