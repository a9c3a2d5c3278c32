//! 组件作用域内的异步任务
//!
//! 组件卸载时中止仍在进行的请求，迟到的响应不会写入已销毁的信号。
//! 事件回调中没有可用的 Owner，所以句柄在组件创建时统一登记。

use futures::future::{AbortHandle, Abortable};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::future::Future;

/// 仍在进行的任务，完成后自行移除
#[derive(Default)]
struct Pending {
    next_id: u64,
    handles: Vec<(u64, AbortHandle)>,
}

impl Pending {
    fn insert(&mut self, handle: AbortHandle) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.handles.push((id, handle));
        id
    }

    fn remove(&mut self, id: u64) {
        self.handles.retain(|(task, _)| *task != id);
    }

    fn abort_all(&mut self) {
        for (_, handle) in self.handles.drain(..) {
            handle.abort();
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.handles.len()
    }
}

#[derive(Clone, Copy)]
pub struct TaskScope {
    pending: StoredValue<Pending>,
}

impl TaskScope {
    /// 在当前组件下创建，组件清理时中止所有任务
    pub fn new() -> Self {
        let pending = StoredValue::new(Pending::default());
        on_cleanup(move || {
            pending.try_update_value(Pending::abort_all);
        });
        Self { pending }
    }

    pub fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + 'static,
    {
        let (handle, registration) = AbortHandle::new_pair();
        let pending = self.pending;
        let Some(id) = pending.try_update_value(|p| p.insert(handle)) else {
            log::debug!("[Task] scope already disposed, not spawning");
            return;
        };

        spawn_local(async move {
            match Abortable::new(fut, registration).await {
                Ok(()) => {
                    pending.try_update_value(|p| p.remove(id));
                }
                Err(_) => log::debug!("[Task] aborted on teardown"),
            }
        });
    }
}

impl Default for TaskScope {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finished_tasks_are_removed() {
        let mut pending = Pending::default();
        let first = pending.insert(AbortHandle::new_pair().0);
        let second = pending.insert(AbortHandle::new_pair().0);
        assert_ne!(first, second);

        pending.remove(first);
        assert_eq!(pending.len(), 1);
        pending.remove(second);
        assert_eq!(pending.len(), 0);
    }

    #[tokio::test]
    async fn test_abort_all_stops_remaining_tasks() {
        let mut pending = Pending::default();
        let (handle, registration) = AbortHandle::new_pair();
        pending.insert(handle);

        pending.abort_all();
        assert_eq!(pending.len(), 0);
        assert!(Abortable::new(async {}, registration).await.is_err());
    }
}
