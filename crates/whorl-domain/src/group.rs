//! Worker-group rendezvous.
//!
//! A [`WorkerGroup`] hands out one [`GroupHandle`] per rank. Handles
//! are moved into worker threads and provide [`GroupHandle::barrier`],
//! the collective used to order sub-box payload writes before the
//! leader's shared-header write. Channels are unbuffered rendezvous
//! channels so no worker can run ahead of the release.

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::error::CollectiveError;

/// Factory for the per-rank handles of a fixed-size worker group.
pub struct WorkerGroup;

impl WorkerGroup {
    /// Creates the handles for a group of `size` workers, ordered by
    /// rank. Rank 0 is the leader.
    ///
    /// All handles must stay alive until the group is done with
    /// collectives: dropping one mid-barrier surfaces as
    /// [`CollectiveError::Disconnected`] on the peers.
    pub fn handles(size: usize) -> Vec<GroupHandle> {
        if size <= 1 {
            return (0..size)
                .map(|rank| GroupHandle {
                    rank,
                    size,
                    role: Role::Solo,
                })
                .collect();
        }

        let (arrive_tx, arrive_rx) = bounded(0);
        let mut release_txs = Vec::with_capacity(size - 1);
        let mut members = Vec::with_capacity(size - 1);
        for rank in 1..size {
            let (release_tx, release_rx) = bounded(0);
            release_txs.push(release_tx);
            members.push(GroupHandle {
                rank,
                size,
                role: Role::Member {
                    arrive_tx: arrive_tx.clone(),
                    release_rx,
                },
            });
        }

        let mut handles = Vec::with_capacity(size);
        handles.push(GroupHandle {
            rank: 0,
            size,
            role: Role::Leader {
                arrive_rx,
                release_txs,
            },
        });
        handles.extend(members);
        handles
    }
}

/// One rank's endpoint of the group rendezvous.
pub struct GroupHandle {
    rank: usize,
    size: usize,
    role: Role,
}

enum Role {
    /// A group of one; every collective is a no-op.
    Solo,
    /// Rank 0: collects arrivals, then releases everyone.
    Leader {
        arrive_rx: Receiver<usize>,
        release_txs: Vec<Sender<()>>,
    },
    /// Ranks 1..size: announce arrival, wait for release.
    Member {
        arrive_tx: Sender<usize>,
        release_rx: Receiver<()>,
    },
}

impl GroupHandle {
    /// This handle's rank within the group.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Number of workers in the group.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether this rank writes shared artifacts such as file headers.
    pub fn is_leader(&self) -> bool {
        self.rank == 0
    }

    /// Blocks until every rank in the group has reached the barrier.
    ///
    /// No rank returns before all ranks have entered, so writes issued
    /// before the barrier on any rank are visible ordering-wise before
    /// work issued after it on every rank.
    pub fn barrier(&self) -> Result<(), CollectiveError> {
        match &self.role {
            Role::Solo => Ok(()),
            Role::Leader {
                arrive_rx,
                release_txs,
            } => {
                for _ in 0..self.size - 1 {
                    arrive_rx
                        .recv()
                        .map_err(|_| CollectiveError::Disconnected { rank: self.rank })?;
                }
                for tx in release_txs {
                    tx.send(())
                        .map_err(|_| CollectiveError::Disconnected { rank: self.rank })?;
                }
                Ok(())
            }
            Role::Member {
                arrive_tx,
                release_rx,
            } => {
                arrive_tx
                    .send(self.rank)
                    .map_err(|_| CollectiveError::Disconnected { rank: self.rank })?;
                release_rx
                    .recv()
                    .map_err(|_| CollectiveError::Disconnected { rank: self.rank })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn solo_barrier_is_a_no_op() {
        let handles = WorkerGroup::handles(1);
        assert_eq!(handles.len(), 1);
        assert!(handles[0].is_leader());
        handles[0].barrier().unwrap();
        handles[0].barrier().unwrap();
    }

    #[test]
    fn ranks_are_assigned_in_order() {
        let handles = WorkerGroup::handles(4);
        for (i, h) in handles.iter().enumerate() {
            assert_eq!(h.rank(), i);
            assert_eq!(h.size(), 4);
            assert_eq!(h.is_leader(), i == 0);
        }
    }

    #[test]
    fn barrier_orders_pre_barrier_work_before_post_barrier_work() {
        let arrived = Arc::new(AtomicUsize::new(0));
        let handles = WorkerGroup::handles(4);

        let workers: Vec<_> = handles
            .into_iter()
            .map(|handle| {
                let arrived = Arc::clone(&arrived);
                thread::spawn(move || {
                    arrived.fetch_add(1, Ordering::SeqCst);
                    handle.barrier().unwrap();
                    // Every rank must have checked in before any rank
                    // passes the barrier.
                    assert_eq!(arrived.load(Ordering::SeqCst), 4);
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }
    }

    #[test]
    fn repeated_barriers_stay_in_lockstep() {
        let counter = Arc::new(AtomicUsize::new(0));
        let handles = WorkerGroup::handles(3);

        let workers: Vec<_> = handles
            .into_iter()
            .map(|handle| {
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    for round in 0..5 {
                        counter.fetch_add(1, Ordering::SeqCst);
                        handle.barrier().unwrap();
                        assert_eq!(counter.load(Ordering::SeqCst), (round + 1) * 3);
                        handle.barrier().unwrap();
                    }
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }
    }

    #[test]
    fn dropped_peer_surfaces_as_disconnect() {
        let mut handles = WorkerGroup::handles(2);
        let member = handles.pop().unwrap();
        drop(handles); // leader gone

        let err = member.barrier().unwrap_err();
        assert_eq!(err, CollectiveError::Disconnected { rank: 1 });
    }
}
