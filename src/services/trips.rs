use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::{fs, sync::Mutex};
use tracing::warn;

use crate::{
    error::AppError,
    models::trip::{NewTrip, Participant, Trip},
};

/// The trip store as the flows see it: a handful of document operations,
/// with the store as the single source of truth for participant lists.
#[async_trait]
pub trait TripGateway: Send + Sync {
    /// Full snapshot in a deterministic order; no pagination.
    async fn list_trips(&self) -> Result<Vec<Trip>, AppError>;
    async fn get_trip(&self, id: &str) -> Result<Trip, AppError>;
    async fn create_trip(&self, draft: NewTrip) -> Result<String, AppError>;
    /// Atomic append: rejects a duplicate participant id or an append past
    /// capacity with `Conflict`. Returns the updated trip so the caller can
    /// mirror state only after the write committed.
    async fn append_participant_if_absent(
        &self,
        trip_id: &str,
        participant: Participant,
    ) -> Result<Trip, AppError>;
}

/// JSON-document trip store: one file per trip under `<root>/trips/`.
/// Mutations are serialised through a store-wide lock so the duplicate and
/// capacity checks cannot race a concurrent signup.
#[derive(Clone)]
pub struct TripStore {
    root: Arc<PathBuf>,
    write_lock: Arc<Mutex<()>>,
}

impl TripStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root: Arc::new(root),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn trips_dir(&self) -> PathBuf {
        self.root.join("trips")
    }

    fn trip_path(&self, id: &str) -> PathBuf {
        self.trips_dir().join(format!("{id}.json"))
    }

    pub async fn ensure_structure(&self) -> Result<(), AppError> {
        fs::create_dir_all(self.trips_dir()).await?;
        Ok(())
    }

    async fn load_trip(&self, id: &str) -> Result<Trip, AppError> {
        let path = self.trip_path(id);
        if !fs::try_exists(&path)
            .await
            .map_err(|err| AppError::fetch("stat trip document", err))?
        {
            return Err(AppError::NotFound);
        }
        read_trip_document(&path).await
    }

    async fn write_trip(&self, trip: &Trip) -> Result<(), AppError> {
        let data = serde_json::to_vec_pretty(trip)
            .map_err(|err| AppError::fetch("encode trip document", err))?;
        fs::write(self.trip_path(&trip.id), data)
            .await
            .map_err(|err| AppError::fetch("write trip document", err))?;
        Ok(())
    }
}

#[async_trait]
impl TripGateway for TripStore {
    async fn list_trips(&self) -> Result<Vec<Trip>, AppError> {
        let mut entries = fs::read_dir(self.trips_dir())
            .await
            .map_err(|err| AppError::fetch("open trip collection", err))?;

        let mut trips = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| AppError::fetch("scan trip collection", err))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            trips.push(read_trip_document(&path).await?);
        }

        // Directory snapshots must come back in a stable fetch order.
        trips.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(trips)
    }

    async fn get_trip(&self, id: &str) -> Result<Trip, AppError> {
        self.load_trip(id).await
    }

    async fn create_trip(&self, draft: NewTrip) -> Result<String, AppError> {
        let trip = Trip::create(draft);
        let _guard = self.write_lock.lock().await;
        self.write_trip(&trip).await?;
        Ok(trip.id)
    }

    async fn append_participant_if_absent(
        &self,
        trip_id: &str,
        participant: Participant,
    ) -> Result<Trip, AppError> {
        let _guard = self.write_lock.lock().await;

        let mut trip = self.load_trip(trip_id).await?;
        if trip.has_participant(&participant.id) {
            return Err(AppError::Conflict(
                "you are already signed up for this trip".into(),
            ));
        }
        if trip.is_full() {
            warn!(trip_id, "signup raced past capacity");
            return Err(AppError::Conflict("this trip is already full".into()));
        }

        trip.participants.push(participant);
        self.write_trip(&trip).await?;
        Ok(trip)
    }
}

async fn read_trip_document(path: &Path) -> Result<Trip, AppError> {
    let raw = fs::read(path)
        .await
        .map_err(|err| AppError::fetch("read trip document", err))?;
    serde_json::from_slice(&raw).map_err(|err| AppError::fetch("decode trip document", err))
}
