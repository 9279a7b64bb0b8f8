use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fmt;
use std::sync::Arc;

use crate::app_config::Config;
use crate::cache::{CacheKey, TranscriptCache};
use crate::discovery::TrackDiscovery;
use crate::errors::{ErrorKind, TranscriptError};
use crate::fetcher::{FetchMetrics, RetryPolicy, TranscriptFetcher};
use crate::parser;
use crate::providers::CaptionProvider;
use crate::providers::youtube::YouTubeProvider;
use crate::selector;
use crate::transcript::{CaptionTrack, Transcript};
use crate::video_id::VideoId;

// @module: Transcript retrieval facade

// @enum: Stages of one retrieval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalStage {
    Validating,
    CacheCheck,
    Discovering,
    Selecting,
    Fetching,
    Parsing,
    CacheStore,
    Done,
    Failed(ErrorKind),
}

impl fmt::Display for RetrievalStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetrievalStage::Failed(kind) => write!(f, "Failed({})", kind),
            other => write!(f, "{:?}", other),
        }
    }
}

// @struct: Stage tracker of a single invocation
struct Run {
    // @field: Input as given by the caller, for log lines
    input: String,

    // @field: Current stage
    stage: RetrievalStage,
}

impl Run {
    fn new(input: &str) -> Self {
        debug!("[{}] -> {}", input, RetrievalStage::Validating);
        Self {
            input: input.to_string(),
            stage: RetrievalStage::Validating,
        }
    }

    // @updates: Move to the next stage
    fn enter(&mut self, next: RetrievalStage) {
        debug!("[{}] {} -> {}", self.input, self.stage, next);
        self.stage = next;
    }
}

// @struct: Retrieval facade composing discovery, selection, fetching, parsing and caching
pub struct TranscriptService {
    // @field: Effective configuration
    config: Config,

    // @field: Track listing
    discovery: TrackDiscovery,

    // @field: Payload download with retry
    fetcher: TranscriptFetcher,

    // @field: Parsed transcript cache
    cache: TranscriptCache,
}

impl TranscriptService {
    // @creates: Service talking to the configured caption host
    pub fn new(config: Config) -> Result<Self> {
        let provider = YouTubeProvider::new(&config.upstream, config.caption_format, config.fetch_timeout())
            .context("Failed to create caption provider")?;

        Self::with_provider(config, Arc::new(provider))
    }

    // @creates: Service using the given provider
    pub fn with_provider(config: Config, provider: Arc<dyn CaptionProvider>) -> Result<Self> {
        config.validate().context("Invalid configuration")?;

        let discovery = TrackDiscovery::new(Arc::clone(&provider), config.fetch_timeout());
        let fetcher = TranscriptFetcher::new(provider, RetryPolicy::from_config(&config));
        let cache = TranscriptCache::new(config.cache_capacity, config.cache_ttl());

        info!(
            "Transcript service ready (languages: {}, cache: {} entries / {}s, retries: {})",
            config.language_preferences.join(","),
            config.cache_capacity,
            config.cache_ttl_seconds,
            config.max_fetch_retries
        );

        Ok(Self {
            config,
            discovery,
            fetcher,
            cache,
        })
    }

    /// Retrieve the transcript of a video using the configured language preferences
    ///
    /// `video_id` may be a bare identifier or a video URL.
    pub async fn get_transcript(&self, video_id: &str) -> Result<Transcript, TranscriptError> {
        self.retrieve(video_id, &self.config.language_preferences).await
    }

    /// Retrieve a transcript with a per-call language preference list
    ///
    /// An empty list falls back to the configured preferences.
    pub async fn get_transcript_with_languages<S: AsRef<str>>(
        &self,
        video_id: &str,
        languages: &[S],
    ) -> Result<Transcript, TranscriptError> {
        if languages.is_empty() {
            return self.get_transcript(video_id).await;
        }

        let languages: Vec<String> = languages.iter().map(|l| l.as_ref().trim().to_string()).collect();
        self.retrieve(video_id, &languages).await
    }

    /// List the caption tracks of a video without fetching any payload
    pub async fn list_tracks(&self, video_id: &str) -> Result<Vec<CaptionTrack>, TranscriptError> {
        let video_id = VideoId::from_url_or_id(video_id)?;
        self.discovery.discover(&video_id).await
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &TranscriptCache {
        &self.cache
    }

    pub fn fetch_metrics(&self) -> &FetchMetrics {
        self.fetcher.metrics()
    }

    async fn retrieve(&self, input: &str, preferences: &[String]) -> Result<Transcript, TranscriptError> {
        let mut run = Run::new(input);

        match self.run_stages(&mut run, input, preferences).await {
            Ok(transcript) => {
                run.enter(RetrievalStage::Done);
                Ok(Transcript::clone(&transcript))
            }
            Err(e) => {
                run.enter(RetrievalStage::Failed(e.kind()));
                warn!("Transcript retrieval for '{}' failed: {}", input, e);
                Err(e)
            }
        }
    }

    async fn run_stages(
        &self,
        run: &mut Run,
        input: &str,
        preferences: &[String],
    ) -> Result<Arc<Transcript>, TranscriptError> {
        let video_id = VideoId::from_url_or_id(input)?;

        run.enter(RetrievalStage::CacheCheck);
        let key = CacheKey::new(video_id.clone(), preferences);
        if let Some(transcript) = self.cache.get(&key) {
            return Ok(transcript);
        }

        run.enter(RetrievalStage::Discovering);
        let tracks = self.discovery.discover(&video_id).await?;

        run.enter(RetrievalStage::Selecting);
        let track = selector::select_track(&tracks, preferences).ok_or_else(|| {
            TranscriptError::NoCaptionsAvailable {
                video_id: video_id.to_string(),
            }
        })?;

        run.enter(RetrievalStage::Fetching);
        let payload = self.fetcher.fetch(track).await?;

        run.enter(RetrievalStage::Parsing);
        let segments = parser::parse_payload(&payload, track.format)?;
        let transcript = Arc::new(Transcript::new(video_id, track, segments));

        run.enter(RetrievalStage::CacheStore);
        self.cache.put(key, Arc::clone(&transcript));

        info!(
            "Retrieved {} segment(s) for {} ({})",
            transcript.len(),
            transcript.video_id,
            track
        );
        Ok(transcript)
    }
}

impl fmt::Debug for TranscriptService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranscriptService")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish()
    }
}
