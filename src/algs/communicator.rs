//! Thin façade over intra-process (threaded) or inter-process (MPI) message
//! passing.
//!
//! Messages are *contiguous byte slices*. Both directions block: `send`
//! returns once the message is handed to the transport, `recv` returns once a
//! message from the named peer with the named tag is available. Messages
//! between one `(src, dst, tag)` triple arrive in FIFO order.

use crate::tree_error::TreeError;
use bytes::Bytes;
use hashbrown::HashMap;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::Arc;

/// Blocking point-to-point communication interface.
pub trait Communicator {
    fn rank(&self) -> usize;
    fn size(&self) -> usize;

    fn send(&self, peer: usize, tag: u16, buf: &[u8]) -> Result<(), TreeError>;
    fn recv(&self, peer: usize, tag: u16) -> Result<Bytes, TreeError>;

    /// Tear down every rank of the group. Does not return.
    fn abort(&self, code: i32) -> !;
}

// --- LocalComm: intra-process / one thread per rank ---
type Key = (usize, usize, u16); // (src, dst, tag)

#[derive(Default)]
struct Mailboxes {
    queues: Mutex<HashMap<Key, VecDeque<Bytes>>>,
    arrived: Condvar,
}

/// In-process communicator: every rank is a handle onto one shared set of
/// mailboxes. Hand each handle to its own thread.
#[derive(Clone)]
pub struct LocalComm {
    rank: usize,
    size: usize,
    boxes: Arc<Mailboxes>,
}

impl LocalComm {
    /// Handles for ranks `0..size`, all wired to the same mailboxes.
    pub fn universe(size: usize) -> Vec<LocalComm> {
        let boxes = Arc::new(Mailboxes::default());
        (0..size)
            .map(|rank| LocalComm {
                rank,
                size,
                boxes: Arc::clone(&boxes),
            })
            .collect()
    }

    fn check_peer(&self, peer: usize) -> Result<(), TreeError> {
        if peer < self.size {
            Ok(())
        } else {
            Err(TreeError::Transport {
                peer,
                reason: format!("no such rank (world size {})", self.size),
            })
        }
    }
}

impl std::fmt::Debug for LocalComm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalComm")
            .field("rank", &self.rank)
            .field("size", &self.size)
            .finish()
    }
}

impl Communicator for LocalComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn send(&self, peer: usize, tag: u16, buf: &[u8]) -> Result<(), TreeError> {
        self.check_peer(peer)?;
        let key = (self.rank, peer, tag);
        let mut queues = self.boxes.queues.lock();
        queues
            .entry(key)
            .or_default()
            .push_back(Bytes::copy_from_slice(buf));
        self.boxes.arrived.notify_all();
        Ok(())
    }

    fn recv(&self, peer: usize, tag: u16) -> Result<Bytes, TreeError> {
        self.check_peer(peer)?;
        let key = (peer, self.rank, tag);
        let mut queues = self.boxes.queues.lock();
        loop {
            if let Some(msg) = queues.get_mut(&key).and_then(VecDeque::pop_front) {
                return Ok(msg);
            }
            self.boxes.arrived.wait(&mut queues);
        }
    }

    fn abort(&self, code: i32) -> ! {
        log::error!("[rank {}] aborting local group with code {code}", self.rank);
        std::process::exit(code)
    }
}

// --- MPI backend (feature = "mpi-support") ---
#[cfg(feature = "mpi-support")]
mod mpi_backend {
    use super::*;
    use mpi::environment::Universe;
    use mpi::topology::SimpleCommunicator;
    use mpi::traits::{Communicator as _, Destination, Source};

    /// World communicator of an `mpirun` launch. Owns the MPI universe, so
    /// MPI is finalized when this is dropped.
    pub struct MpiComm {
        pub world: SimpleCommunicator,
        rank: usize,
        size: usize,
        _universe: Universe,
    }

    impl MpiComm {
        pub fn new() -> Result<Self, TreeError> {
            let universe = mpi::initialize().ok_or(TreeError::MpiInit)?;
            let world = universe.world();
            let rank = world.rank() as usize;
            let size = world.size() as usize;
            Ok(Self {
                world,
                rank,
                size,
                _universe: universe,
            })
        }
    }

    impl Communicator for MpiComm {
        fn rank(&self) -> usize {
            self.rank
        }

        fn size(&self) -> usize {
            self.size
        }

        fn send(&self, peer: usize, tag: u16, buf: &[u8]) -> Result<(), TreeError> {
            if peer >= self.size {
                return Err(TreeError::Transport {
                    peer,
                    reason: "no such rank".into(),
                });
            }
            self.world
                .process_at_rank(peer as i32)
                .send_with_tag(buf, i32::from(tag));
            Ok(())
        }

        fn recv(&self, peer: usize, tag: u16) -> Result<Bytes, TreeError> {
            if peer >= self.size {
                return Err(TreeError::Transport {
                    peer,
                    reason: "no such rank".into(),
                });
            }
            let (msg, _status) = self
                .world
                .process_at_rank(peer as i32)
                .receive_vec_with_tag::<u8>(i32::from(tag));
            Ok(Bytes::from(msg))
        }

        fn abort(&self, code: i32) -> ! {
            self.world.abort(code)
        }
    }
}

#[cfg(feature = "mpi-support")]
pub use mpi_backend::MpiComm;
