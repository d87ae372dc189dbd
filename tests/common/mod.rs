//! In-memory runtime fakes shared by the end-to-end tests.
//!
//! `FakeRuntime` hands out `FakeContainer`s whose processes are plain
//! structs with a settable exit status, which is all the supervisor ever
//! reads through the runtime seam.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use boxvisor::{
    Checkpoint, Container, ContainerRef, Process, ProcessRef, ProcessSpec, ProcessUpdate,
    Runtime, Stat, State, SupervisorError, INIT_PROCESS_ID,
};

pub struct FakeProcess {
    id: String,
    container: String,
    exit: Mutex<Option<i32>>,
}

impl FakeProcess {
    pub fn alive(container: &str, id: &str) -> Arc<Self> {
        Arc::new(Self {
            id: id.into(),
            container: container.into(),
            exit: Mutex::new(None),
        })
    }

    pub fn exited(container: &str, id: &str, status: i32) -> Arc<Self> {
        let p = Self::alive(container, id);
        p.set_exited(status);
        p
    }

    pub fn set_exited(&self, status: i32) {
        *self.exit.lock().unwrap() = Some(status);
    }
}

#[async_trait]
impl Process for FakeProcess {
    fn id(&self) -> &str {
        &self.id
    }

    fn container_id(&self) -> &str {
        &self.container
    }

    async fn exit_status(&self) -> Result<i32, SupervisorError> {
        (*self.exit.lock().unwrap()).ok_or(SupervisorError::ProcessNotExited {
            id: self.id.clone(),
        })
    }
}

pub struct FakeContainer {
    id: String,
    state: Mutex<State>,
    processes: Mutex<Vec<Arc<FakeProcess>>>,
    signals: Mutex<Vec<(String, i32)>>,
    checkpoints: Mutex<Vec<Checkpoint>>,
    exec_seq: AtomicU64,
    deleted: AtomicBool,
}

impl FakeContainer {
    /// A running container with a live init process.
    pub fn new(id: &str) -> Arc<Self> {
        Self::with_processes(id, vec![FakeProcess::alive(id, INIT_PROCESS_ID)])
    }

    pub fn with_processes(id: &str, processes: Vec<Arc<FakeProcess>>) -> Arc<Self> {
        Arc::new(Self {
            id: id.into(),
            state: Mutex::new(State::Running),
            processes: Mutex::new(processes),
            signals: Mutex::new(Vec::new()),
            checkpoints: Mutex::new(Vec::new()),
            exec_seq: AtomicU64::new(0),
            deleted: AtomicBool::new(false),
        })
    }

    pub fn process(&self, id: &str) -> Option<Arc<FakeProcess>> {
        self.processes.lock().unwrap().iter().find(|p| p.id == id).cloned()
    }

    pub fn init(&self) -> Arc<FakeProcess> {
        self.process(INIT_PROCESS_ID).expect("init process")
    }

    pub fn signals(&self) -> Vec<(String, i32)> {
        self.signals.lock().unwrap().clone()
    }

    pub fn checkpoint_names(&self) -> Vec<String> {
        self.checkpoints.lock().unwrap().iter().map(|c| c.name.clone()).collect()
    }

    pub fn was_deleted(&self) -> bool {
        self.deleted.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Container for FakeContainer {
    fn id(&self) -> &str {
        &self.id
    }

    fn state(&self) -> State {
        *self.state.lock().unwrap()
    }

    async fn processes(&self) -> Result<Vec<ProcessRef>, SupervisorError> {
        Ok(self
            .processes
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.clone() as ProcessRef)
            .collect())
    }

    async fn stats(&self) -> Result<Stat, SupervisorError> {
        Ok(Stat {
            timestamp: Utc::now(),
            data: serde_json::json!({ "memory_bytes": 4096, "id": self.id }),
        })
    }

    async fn signal(&self, process_id: &str, signal: i32) -> Result<(), SupervisorError> {
        if self.process(process_id).is_none() {
            return Err(SupervisorError::ProcessNotFound {
                id: process_id.into(),
                container: self.id.clone(),
            });
        }
        self.signals.lock().unwrap().push((process_id.into(), signal));
        Ok(())
    }

    async fn exec(&self, _spec: ProcessSpec) -> Result<ProcessRef, SupervisorError> {
        let n = self.exec_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let process = FakeProcess::alive(&self.id, &format!("exec-{n}"));
        self.processes.lock().unwrap().push(process.clone());
        Ok(process)
    }

    async fn pause(&self) -> Result<(), SupervisorError> {
        *self.state.lock().unwrap() = State::Paused;
        Ok(())
    }

    async fn resume(&self) -> Result<(), SupervisorError> {
        *self.state.lock().unwrap() = State::Running;
        Ok(())
    }

    async fn update_process(
        &self,
        process_id: &str,
        _update: ProcessUpdate,
    ) -> Result<(), SupervisorError> {
        if self.process(process_id).is_none() {
            return Err(SupervisorError::ProcessNotFound {
                id: process_id.into(),
                container: self.id.clone(),
            });
        }
        Ok(())
    }

    async fn checkpoint(&self, checkpoint: Checkpoint) -> Result<(), SupervisorError> {
        let mut checkpoints = self.checkpoints.lock().unwrap();
        if checkpoints.iter().any(|c| c.name == checkpoint.name) {
            return Err(SupervisorError::CheckpointExists {
                name: checkpoint.name,
            });
        }
        checkpoints.push(checkpoint);
        Ok(())
    }

    async fn delete_checkpoint(&self, name: &str) -> Result<(), SupervisorError> {
        let mut checkpoints = self.checkpoints.lock().unwrap();
        let before = checkpoints.len();
        checkpoints.retain(|c| c.name != name);
        if checkpoints.len() == before {
            return Err(SupervisorError::CheckpointNotExists { name: name.into() });
        }
        Ok(())
    }

    async fn delete(&self) -> Result<(), SupervisorError> {
        self.deleted.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeRuntime {
    containers: Mutex<HashMap<String, Arc<FakeContainer>>>,
}

impl FakeRuntime {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers a container for `load` to find during restore.
    pub fn seed(&self, container: Arc<FakeContainer>) {
        self.containers
            .lock()
            .unwrap()
            .insert(container.id.clone(), container);
    }

    /// The container behind an id, whether seeded or created.
    pub fn container(&self, id: &str) -> Option<Arc<FakeContainer>> {
        self.containers.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl Runtime for FakeRuntime {
    async fn create(
        &self,
        id: &str,
        _bundle: &Path,
        _state_dir: &Path,
    ) -> Result<ContainerRef, SupervisorError> {
        let container = FakeContainer::new(id);
        self.containers
            .lock()
            .unwrap()
            .insert(id.to_string(), container.clone());
        Ok(container)
    }

    async fn load(&self, _state_dir: &Path, id: &str) -> Result<ContainerRef, SupervisorError> {
        self.container(id)
            .map(|c| c as ContainerRef)
            .ok_or(SupervisorError::InvalidContainerType)
    }
}
