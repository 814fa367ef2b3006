// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-aligned priority queues.
//!
//! Tasks are plain values; the owner drains them queue by queue at a frame
//! boundary and dispatches them itself. Draining `High` before `Normal` lets
//! a high-priority task enqueue normal or low work that still runs in the
//! same frame.

use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::host::TickSource;

/// Queue a task is placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    /// Recomputation in response to scroll and resize.
    High,
    /// Settle notifications.
    Normal,
    /// Diagnostics, last in every frame.
    Low,
}

impl Priority {
    /// Every priority in drain order.
    pub const ALL: [Self; 3] = [Self::High, Self::Normal, Self::Low];

    const fn slot(self) -> usize {
        match self {
            Self::High => 0,
            Self::Normal => 1,
            Self::Low => 2,
        }
    }
}

/// Handle of a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// Tasks drained from one queue.
pub type TaskBatch<T> = SmallVec<[(TaskId, T); 4]>;

/// Three FIFO queues flushed on frame boundaries supplied by a [`TickSource`].
#[derive(Debug)]
pub struct FrameScheduler<T, K> {
    ticks: K,
    queues: [Vec<(TaskId, T)>; 3],
    next_id: u64,
    frame_requested: bool,
}

impl<T, K: TickSource> FrameScheduler<T, K> {
    /// Creates an empty scheduler requesting frames from `ticks`.
    pub fn new(ticks: K) -> Self {
        Self {
            ticks,
            queues: [Vec::new(), Vec::new(), Vec::new()],
            next_id: 1,
            frame_requested: false,
        }
    }

    /// The tick source.
    pub fn ticks(&self) -> &K {
        &self.ticks
    }

    /// Mutable access to the tick source.
    pub fn ticks_mut(&mut self) -> &mut K {
        &mut self.ticks
    }

    fn allocate(&mut self) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        id
    }

    fn ensure_frame(&mut self) {
        if !self.frame_requested {
            self.frame_requested = true;
            self.ticks.request_frame();
        }
    }

    /// Queues `task` and makes sure a frame is requested.
    pub fn schedule(&mut self, task: T, priority: Priority) -> TaskId {
        let id = self.allocate();
        self.queues[priority.slot()].push((id, task));
        self.ensure_frame();
        id
    }

    /// Allocates an id for `task` without queueing it.
    ///
    /// The caller runs the returned task inline; ids stay unique across queued
    /// and inline work.
    pub fn immediate(&mut self, task: T) -> (TaskId, T) {
        (self.allocate(), task)
    }

    /// Removes a queued task. Returns `false` if it already ran or never existed.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        for queue in &mut self.queues {
            if let Some(position) = queue.iter().position(|(queued, _)| *queued == id) {
                queue.remove(position);
                return true;
            }
        }
        false
    }

    /// Returns `true` if `id` is still queued.
    #[must_use]
    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.queues
            .iter()
            .any(|queue| queue.iter().any(|(queued, _)| *queued == id))
    }

    /// Number of queued tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queues.iter().map(Vec::len).sum()
    }

    /// Returns `true` if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queues.iter().all(Vec::is_empty)
    }

    /// Returns `true` while a frame request is outstanding.
    #[must_use]
    pub fn frame_requested(&self) -> bool {
        self.frame_requested
    }

    /// Marks the requested frame as delivered.
    ///
    /// Call at the start of a frame, before draining; tasks scheduled while the
    /// frame runs then request the next one.
    pub fn begin_frame(&mut self) {
        self.frame_requested = false;
    }

    /// Withdraws an outstanding frame request, for synchronous flushes.
    pub fn cancel_frame(&mut self) {
        if self.frame_requested {
            self.frame_requested = false;
            self.ticks.cancel_frame();
        }
    }

    /// Takes every task currently queued at `priority`, oldest first.
    pub fn drain(&mut self, priority: Priority) -> TaskBatch<T> {
        self.queues[priority.slot()].drain(..).collect()
    }

    /// Drops every queued task and withdraws the frame request.
    pub fn clear(&mut self) {
        for queue in &mut self.queues {
            queue.clear();
        }
        self.cancel_frame();
    }
}
