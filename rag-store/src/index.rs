//! LanceDB-backed vector index stored under one folder.
//!
//! Two tables live in the database:
//!
//! - `chunks`: one row per chunk (`ordinal`, `text`, `source`, `kind`,
//!   `chunk_index`, `vector`), written in ingestion order.
//! - `index_meta`: key/value rows describing how the vectors were built
//!   (format version, embedding model, dimension, distance).
//!
//! Nearest-neighbour search is delegated to LanceDB. Results come back by
//! ascending distance; equal distances are ordered by `ordinal`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use arrow_array::cast::AsArray;
use arrow_array::types::{Float32Type, Int64Type};
use arrow_array::{
    Array, ArrayRef, FixedSizeListArray, Int64Array, RecordBatch, RecordBatchIterator, StringArray,
};
use arrow_schema::{DataType, Field, Schema};
use doc_indexer::DocumentKind;
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase, Select};
use lancedb::{Connection, DistanceType, Table};
use tracing::{debug, info, warn};

use crate::config::DistanceKind;
use crate::errors::{RagError, Result};
use crate::record::{RagHit, RagRecord};

const CHUNKS_TABLE: &str = "chunks";
const META_TABLE: &str = "index_meta";

const FORMAT_VERSION: u32 = 1;

/// How the stored vectors were produced.
#[derive(Debug, Clone, PartialEq, Eq)]
struct IndexInfo {
    embedding_model: String,
    dim: usize,
    distance: DistanceKind,
}

/// Handle over a persisted index. Cheap to share: the LanceDB table is
/// reference counted and read-only after creation.
#[derive(Clone)]
pub struct VectorIndex {
    table: Table,
    info: IndexInfo,
    len: usize,
}

impl VectorIndex {
    /// Writes `rows` as a new index in `dir`, replacing whatever was there.
    /// The dimension is taken from the first vector.
    ///
    /// # Errors
    /// - [`RagError::Embedding`] if `rows` is empty
    /// - [`RagError::VectorSizeMismatch`] if the vectors disagree on length
    /// - [`RagError::LanceDb`] / [`RagError::Arrow`] on storage failures
    pub async fn create(
        dir: &Path,
        embedding_model: &str,
        distance: DistanceKind,
        rows: Vec<(Vec<f32>, RagRecord)>,
    ) -> Result<Self> {
        let dim = rows
            .first()
            .map(|(v, _)| v.len())
            .ok_or_else(|| RagError::Embedding("no chunks to embed".into()))?;
        if let Some((bad, _)) = rows.iter().find(|(v, _)| v.len() != dim) {
            return Err(RagError::VectorSizeMismatch {
                got: bad.len(),
                want: dim,
            });
        }
        let info = IndexInfo {
            embedding_model: embedding_model.to_string(),
            dim,
            distance,
        };

        std::fs::create_dir_all(dir)?;
        let conn = connect(dir).await?;
        for name in [CHUNKS_TABLE, META_TABLE] {
            if conn.table_names().execute().await?.iter().any(|t| t == name) {
                conn.drop_table(name, &[]).await?;
                debug!(table = name, "dropped previous table");
            }
        }

        let len = rows.len();
        let batch = chunks_batch(dim, rows)?;
        let schema = batch.schema();
        let reader = RecordBatchIterator::new(vec![Ok(batch)], schema);
        let table = conn
            .create_table(CHUNKS_TABLE, Box::new(reader))
            .execute()
            .await?;

        write_meta(
            &conn,
            &[
                ("format_version", FORMAT_VERSION.to_string()),
                ("embedding_model", info.embedding_model.clone()),
                ("dim", dim.to_string()),
                ("distance", info.distance.to_string()),
            ],
        )
        .await?;

        info!(dir = %dir.display(), vectors = len, dim, distance = %distance, "index saved");
        Ok(Self {
            table,
            info,
            len,
        })
    }

    /// Opens an index written by [`VectorIndex::create`].
    ///
    /// # Errors
    /// - [`RagError::IndexNotFound`] if the folder or either table is missing
    /// - [`RagError::Corrupt`] if the metadata is unreadable or from another format
    pub async fn open(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(RagError::IndexNotFound(dir.to_path_buf()));
        }
        let conn = connect(dir).await?;
        let names = conn.table_names().execute().await?;
        if ![CHUNKS_TABLE, META_TABLE]
            .iter()
            .all(|want| names.iter().any(|n| n == want))
        {
            return Err(RagError::IndexNotFound(dir.to_path_buf()));
        }

        let info = read_meta(&conn).await?;
        let table = conn.open_table(CHUNKS_TABLE).execute().await?;
        let len = table.count_rows(None).await?;

        info!(
            dir = %dir.display(),
            vectors = len,
            dim = info.dim,
            model = %info.embedding_model,
            "index loaded"
        );
        Ok(Self {
            table,
            info,
            len,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn dim(&self) -> usize {
        self.info.dim
    }

    pub fn distance(&self) -> DistanceKind {
        self.info.distance
    }

    pub fn embedding_model(&self) -> &str {
        &self.info.embedding_model
    }

    /// Returns at most `k` hits, closest first.
    ///
    /// # Errors
    /// [`RagError::VectorSizeMismatch`] if `query` has the wrong dimension.
    pub async fn search(&self, query: &[f32], k: usize) -> Result<Vec<RagHit>> {
        if query.len() != self.info.dim {
            return Err(RagError::VectorSizeMismatch {
                got: query.len(),
                want: self.info.dim,
            });
        }
        if k == 0 || self.len == 0 {
            return Ok(Vec::new());
        }

        let batches: Vec<RecordBatch> = self
            .table
            .query()
            .nearest_to(query)?
            .distance_type(self.info.distance.into())
            .select(Select::columns(&[
                "ordinal",
                "text",
                "source",
                "kind",
                "chunk_index",
            ]))
            .limit(k)
            .execute()
            .await?
            .try_collect()
            .await?;

        let mut scored = Vec::new();
        for batch in &batches {
            let distances = batch
                .column_by_name("_distance")
                .and_then(|c| c.as_primitive_opt::<Float32Type>())
                .ok_or_else(|| RagError::Corrupt("search result has no _distance".into()))?;
            for (i, (ordinal, record)) in read_records(batch)?.into_iter().enumerate() {
                scored.push((distances.value(i), ordinal, record));
            }
        }
        scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        scored.truncate(k);

        debug!(candidates = self.len, k, returned = scored.len(), "vector search");
        Ok(scored
            .into_iter()
            .map(|(score, _, rec)| RagHit {
                score,
                text: rec.text,
                source: rec.source,
            })
            .collect())
    }

    /// Every stored record, in ingestion order.
    pub async fn records(&self) -> Result<Vec<RagRecord>> {
        let batches: Vec<RecordBatch> = self
            .table
            .query()
            .select(Select::columns(&[
                "ordinal",
                "text",
                "source",
                "kind",
                "chunk_index",
            ]))
            .execute()
            .await?
            .try_collect()
            .await?;

        let mut rows = Vec::with_capacity(self.len);
        for batch in &batches {
            rows.extend(read_records(batch)?);
        }
        rows.sort_by_key(|(ordinal, _)| *ordinal);
        Ok(rows.into_iter().map(|(_, rec)| rec).collect())
    }

    /// Warns when the index was built with a different embedding model.
    pub fn warn_on_model_mismatch(&self, model: &str) -> bool {
        let mismatch = self.info.embedding_model != model;
        if mismatch {
            warn!(
                index_model = %self.info.embedding_model,
                query_model = %model,
                "index was built with a different embedding model; scores may be meaningless"
            );
        }
        mismatch
    }
}

impl From<DistanceKind> for DistanceType {
    fn from(d: DistanceKind) -> Self {
        match d {
            DistanceKind::L2 => DistanceType::L2,
            DistanceKind::Cosine => DistanceType::Cosine,
        }
    }
}

async fn connect(dir: &Path) -> Result<Connection> {
    Ok(lancedb::connect(&dir.to_string_lossy()).execute().await?)
}

fn chunks_schema(dim: usize) -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("ordinal", DataType::Int64, false),
        Field::new("text", DataType::Utf8, false),
        Field::new("source", DataType::Utf8, true),
        Field::new("kind", DataType::Utf8, true),
        Field::new("chunk_index", DataType::Int64, false),
        Field::new(
            "vector",
            DataType::FixedSizeList(Arc::new(Field::new("item", DataType::Float32, true)), dim as i32),
            false,
        ),
    ]))
}

fn chunks_batch(dim: usize, rows: Vec<(Vec<f32>, RagRecord)>) -> Result<RecordBatch> {
    let mut ordinals = Vec::with_capacity(rows.len());
    let mut texts = Vec::with_capacity(rows.len());
    let mut sources = Vec::with_capacity(rows.len());
    let mut kinds = Vec::with_capacity(rows.len());
    let mut chunk_indices = Vec::with_capacity(rows.len());
    let mut vectors = Vec::with_capacity(rows.len());

    for (i, (vector, rec)) in rows.into_iter().enumerate() {
        ordinals.push(i as i64);
        texts.push(rec.text);
        sources.push(rec.source);
        kinds.push(rec.kind.map(DocumentKind::extension));
        chunk_indices.push(rec.chunk_index as i64);
        vectors.push(Some(vector.into_iter().map(Some).collect::<Vec<_>>()));
    }

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(ordinals)),
        Arc::new(StringArray::from(texts)),
        Arc::new(StringArray::from(sources)),
        Arc::new(StringArray::from(kinds)),
        Arc::new(Int64Array::from(chunk_indices)),
        Arc::new(FixedSizeListArray::from_iter_primitive::<Float32Type, _, _>(
            vectors,
            dim as i32,
        )),
    ];
    Ok(RecordBatch::try_new(chunks_schema(dim), columns)?)
}

/// Reads `(ordinal, record)` pairs from a batch of the chunks table.
fn read_records(batch: &RecordBatch) -> Result<Vec<(i64, RagRecord)>> {
    let missing = |name: &str| RagError::Corrupt(format!("chunks table has no usable '{name}' column"));
    let ordinals = batch
        .column_by_name("ordinal")
        .and_then(|c| c.as_primitive_opt::<Int64Type>())
        .ok_or_else(|| missing("ordinal"))?;
    let texts = batch
        .column_by_name("text")
        .and_then(|c| c.as_string_opt::<i32>())
        .ok_or_else(|| missing("text"))?;
    let sources = batch
        .column_by_name("source")
        .and_then(|c| c.as_string_opt::<i32>())
        .ok_or_else(|| missing("source"))?;
    let kinds = batch
        .column_by_name("kind")
        .and_then(|c| c.as_string_opt::<i32>())
        .ok_or_else(|| missing("kind"))?;
    let chunk_indices = batch
        .column_by_name("chunk_index")
        .and_then(|c| c.as_primitive_opt::<Int64Type>())
        .ok_or_else(|| missing("chunk_index"))?;

    let opt = |col: &StringArray, i: usize| col.is_valid(i).then(|| col.value(i).to_string());
    Ok((0..batch.num_rows())
        .map(|i| {
            let record = RagRecord {
                text: texts.value(i).to_string(),
                source: opt(sources, i),
                kind: opt(kinds, i).and_then(|k| DocumentKind::from_extension(&k)),
                chunk_index: chunk_indices.value(i).max(0) as usize,
            };
            (ordinals.value(i), record)
        })
        .collect())
}

fn meta_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("key", DataType::Utf8, false),
        Field::new("value", DataType::Utf8, false),
    ]))
}

/// Replaces the metadata table with `pairs`.
async fn write_meta(conn: &Connection, pairs: &[(&str, String)]) -> Result<()> {
    if conn.table_names().execute().await?.iter().any(|t| t == META_TABLE) {
        conn.drop_table(META_TABLE, &[]).await?;
    }
    let keys: Vec<&str> = pairs.iter().map(|(k, _)| *k).collect();
    let values: Vec<&str> = pairs.iter().map(|(_, v)| v.as_str()).collect();
    let batch = RecordBatch::try_new(
        meta_schema(),
        vec![
            Arc::new(StringArray::from(keys)) as ArrayRef,
            Arc::new(StringArray::from(values)) as ArrayRef,
        ],
    )?;
    let reader = RecordBatchIterator::new(vec![Ok(batch)], meta_schema());
    conn.create_table(META_TABLE, Box::new(reader))
        .execute()
        .await?;
    Ok(())
}

async fn read_meta(conn: &Connection) -> Result<IndexInfo> {
    let table = conn.open_table(META_TABLE).execute().await?;
    let batches: Vec<RecordBatch> = table.query().execute().await?.try_collect().await?;

    let mut meta = HashMap::new();
    for batch in &batches {
        if let (Some(keys), Some(values)) = (
            batch.column_by_name("key").and_then(|c| c.as_string_opt::<i32>()),
            batch.column_by_name("value").and_then(|c| c.as_string_opt::<i32>()),
        ) {
            for i in 0..batch.num_rows() {
                meta.insert(keys.value(i).to_string(), values.value(i).to_string());
            }
        }
    }

    let get = |key: &str| {
        meta.get(key)
            .map(String::as_str)
            .ok_or_else(|| RagError::Corrupt(format!("index metadata has no '{key}'")))
    };
    let version: u32 = get("format_version")?
        .parse()
        .map_err(|_| RagError::Corrupt("format_version is not a number".into()))?;
    if version != FORMAT_VERSION {
        return Err(RagError::Corrupt(format!(
            "unsupported index format version {version}"
        )));
    }
    Ok(IndexInfo {
        embedding_model: get("embedding_model")?.to_string(),
        dim: get("dim")?
            .parse()
            .map_err(|_| RagError::Corrupt("dim is not a number".into()))?,
        distance: get("distance")?.parse()?,
    })
}
