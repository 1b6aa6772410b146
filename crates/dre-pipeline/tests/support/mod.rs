//! In-memory collaborators with call counters.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use dre_core::{
    DamageArea, DamageRecord, DamageType, EmbeddingVector, MatchCount, Severity, UploadPolicy,
};
use dre_pipeline::{EstimateRequest, EstimationPipeline, PipelineSettings};
use dre_services::{
    DescriptionModel, Embedder, ImageFetcher, ImageInput, Label, SearchHit, ServiceError,
    SynthesisModel, TextStream, VectorIndex, VehicleDetector,
};
use dre_store::BlobStore;
use futures::StreamExt;
use futures::stream;
use serde_json::Value;

pub const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
pub const DIMENSION: usize = 8;

#[derive(Default)]
pub struct Calls(AtomicUsize);

impl Calls {
    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct FakeDetector {
    pub labels: Vec<Label>,
    pub calls: Calls,
}

#[async_trait]
impl VehicleDetector for FakeDetector {
    async fn detect(&self, _image: &ImageInput) -> Result<Vec<Label>, ServiceError> {
        self.calls.hit();
        Ok(self.labels.clone())
    }
}

pub struct FakeDescriber {
    pub answer: String,
    pub calls: Calls,
    pub prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl DescriptionModel for FakeDescriber {
    async fn describe(&self, _image: &ImageInput, prompt: &str) -> Result<String, ServiceError> {
        self.calls.hit();
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.answer.clone())
    }
}

pub struct FakeEmbedder {
    pub dimension: usize,
    pub calls: Calls,
    pub texts: Mutex<Vec<String>>,
}

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(
        &self,
        _image: &ImageInput,
        text: &str,
    ) -> Result<EmbeddingVector, ServiceError> {
        self.calls.hit();
        self.texts.lock().unwrap().push(text.to_string());
        Ok(EmbeddingVector::new(vec![0.5; self.dimension]))
    }
}

pub struct FakeIndex {
    pub hits: Vec<SearchHit>,
    pub calls: Calls,
    pub requested_k: Mutex<Option<usize>>,
}

#[async_trait]
impl VectorIndex for FakeIndex {
    async fn query(
        &self,
        _vector: &EmbeddingVector,
        k: usize,
    ) -> Result<Vec<SearchHit>, ServiceError> {
        self.calls.hit();
        *self.requested_k.lock().unwrap() = Some(k);
        Ok(self.hits.clone())
    }
}

pub enum Script {
    Fragments(Vec<&'static str>),
    /// Emit the fragments, then never finish.
    Hang(Vec<&'static str>),
}

pub struct FakeSynthesizer {
    pub script: Script,
    pub calls: Calls,
    pub prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl SynthesisModel for FakeSynthesizer {
    async fn stream(&self, prompt: &str) -> Result<TextStream, ServiceError> {
        self.calls.hit();
        self.prompts.lock().unwrap().push(prompt.to_string());
        let owned = |items: &[&'static str]| -> Vec<Result<String, ServiceError>> {
            items.iter().map(|s| Ok((*s).to_string())).collect()
        };
        Ok(match &self.script {
            Script::Fragments(items) => stream::iter(owned(items)).boxed(),
            Script::Hang(items) => stream::iter(owned(items)).chain(stream::pending()).boxed(),
        })
    }
}

pub struct FakeImages {
    pub calls: Calls,
    pub fetched: Mutex<Vec<String>>,
}

#[async_trait]
impl ImageFetcher for FakeImages {
    async fn fetch(&self, location: &str) -> Result<Bytes, ServiceError> {
        self.calls.hit();
        self.fetched.lock().unwrap().push(location.to_string());
        Ok(Bytes::from(format!("image:{location}")))
    }
}

// ── Harness ────────────────────────────────────────────────────────

pub struct Harness {
    pub detector: Arc<FakeDetector>,
    pub describer: Arc<FakeDescriber>,
    pub embedder: Arc<FakeEmbedder>,
    pub index: Arc<FakeIndex>,
    pub synthesizer: Arc<FakeSynthesizer>,
    pub images: Arc<FakeImages>,
    pub uploads: BlobStore,
    pub settings: PipelineSettings,
}

pub const PROVIDER_ANSWER: [&str; 4] = [
    "The average of $500 and $700 ",
    "is $600.",
    "\nRecommended Service Provider Name: ",
    "Gulf Collision",
];

impl Harness {
    pub fn new(hits: Vec<SearchHit>) -> Self {
        Self {
            detector: Arc::new(FakeDetector {
                labels: vec![label("Car", 99.1), label("Vehicle", 98.7)],
                calls: Calls::default(),
            }),
            describer: Arc::new(FakeDescriber {
                answer: r#"{"make":"Make_1","damage_description":"Dented front left fender"}"#
                    .to_string(),
                calls: Calls::default(),
                prompts: Mutex::default(),
            }),
            embedder: Arc::new(FakeEmbedder {
                dimension: DIMENSION,
                calls: Calls::default(),
                texts: Mutex::default(),
            }),
            index: Arc::new(FakeIndex {
                hits,
                calls: Calls::default(),
                requested_k: Mutex::default(),
            }),
            synthesizer: Arc::new(FakeSynthesizer {
                script: Script::Fragments(PROVIDER_ANSWER.to_vec()),
                calls: Calls::default(),
                prompts: Mutex::default(),
            }),
            images: Arc::new(FakeImages {
                calls: Calls::default(),
                fetched: Mutex::default(),
            }),
            uploads: BlobStore::in_memory("uploads"),
            settings: PipelineSettings {
                required_label: "Vehicle".into(),
                min_confidence: 0.0,
                embedding_dimension: DIMENSION,
                upload_policy: UploadPolicy::StoreThenValidate,
                stream_idle_timeout: Duration::from_secs(2),
                fragment_buffer: 4,
            },
        }
    }

    pub fn without_vehicle(mut self) -> Self {
        self.detector = Arc::new(FakeDetector {
            labels: vec![label("Cat", 97.0), label("Sofa", 80.0)],
            calls: Calls::default(),
        });
        self
    }

    pub fn describing(mut self, answer: &str) -> Self {
        self.describer = Arc::new(FakeDescriber {
            answer: answer.to_string(),
            calls: Calls::default(),
            prompts: Mutex::default(),
        });
        self
    }

    pub fn synthesizing(mut self, script: Script) -> Self {
        self.synthesizer = Arc::new(FakeSynthesizer {
            script,
            calls: Calls::default(),
            prompts: Mutex::default(),
        });
        self
    }

    pub fn embedding_dimension(mut self, dimension: usize) -> Self {
        self.embedder = Arc::new(FakeEmbedder {
            dimension,
            calls: Calls::default(),
            texts: Mutex::default(),
        });
        self
    }

    pub fn pipeline(&self) -> EstimationPipeline {
        EstimationPipeline::builder()
            .detector(self.detector.clone())
            .describer(self.describer.clone())
            .embedder(self.embedder.clone())
            .index(self.index.clone())
            .synthesizer(self.synthesizer.clone())
            .images(self.images.clone())
            .uploads(self.uploads.clone())
            .settings(self.settings.clone())
            .build()
            .unwrap()
    }

    /// Calls made past the presence check.
    pub fn downstream_calls(&self) -> usize {
        self.describer.calls.count()
            + self.embedder.calls.count()
            + self.index.calls.count()
            + self.synthesizer.calls.count()
            + self.images.calls.count()
    }
}

pub fn label(name: &str, confidence: f32) -> Label {
    Label {
        name: name.into(),
        confidence,
    }
}

pub fn hit(score: f64, metadata: Value) -> SearchHit {
    SearchHit {
        score,
        metadata: metadata.as_object().cloned().unwrap(),
    }
}

pub fn record() -> DamageRecord {
    DamageRecord::new(
        "Make_1",
        "Model_1",
        "FL",
        [DamageArea::FrontLeft],
        [DamageType::Dent],
        Severity::Moderate,
    )
    .unwrap()
}

pub fn request(k: u8) -> EstimateRequest {
    EstimateRequest {
        image: Bytes::from_static(PNG),
        filename: "front left.png".into(),
        record: record(),
        matches: MatchCount::try_from(k).unwrap(),
    }
}
