//! 远程配置监听抽象

use crate::events::RemoteResponse;
use futures::Stream;
use infrastructure_common::{RemoteConfigError, RemoteConfigResult};
use std::pin::Pin;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// 监听会话状态
///
/// `Idle → Registered → (Notifying)* → Unsubscribing → Terminated`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WatchState {
    /// 尚未注册监听
    Idle = 0,
    /// 已向配置中心注册监听
    Registered = 1,
    /// 已收到过变更通知
    Notifying = 2,
    /// 收到停止信号, 正在退订
    Unsubscribing = 3,
    /// 会话结束
    Terminated = 4,
}

impl WatchState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Registered,
            2 => Self::Notifying,
            3 => Self::Unsubscribing,
            4 => Self::Terminated,
            _ => Self::Idle,
        }
    }
}

/// 监听会话的共享状态
///
/// 由配置中心回调线程和监听任务共同更新, 不加锁。
#[derive(Debug, Clone, Default)]
pub struct SessionState(Arc<AtomicU8>);

impl SessionState {
    /// 创建处于 `Idle` 的状态
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前状态
    pub fn get(&self) -> WatchState {
        WatchState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// 设置状态
    pub fn set(&self, state: WatchState) {
        self.0.store(state as u8, Ordering::Release);
    }

    /// 记录收到一次通知
    ///
    /// 只有 `Registered` 会推进到 `Notifying`, 进入退订阶段后不再回退。
    pub fn mark_notified(&self) {
        let _ = self.0.compare_exchange(
            WatchState::Registered as u8,
            WatchState::Notifying as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }
}

/// 停止信号的接收端, 由监听任务持有
#[derive(Debug)]
pub struct StopSignal {
    receiver: oneshot::Receiver<()>,
}

impl StopSignal {
    /// 等待停止信号
    ///
    /// 发送端被丢弃同样视为停止。
    pub async fn wait(self) {
        let _ = self.receiver.await;
    }
}

/// 停止信号的发送端, 交给调用方
#[derive(Debug)]
pub struct WatchStopper {
    sender: oneshot::Sender<()>,
}

impl WatchStopper {
    /// 发送停止信号
    ///
    /// 监听任务已经结束时返回 `false`。
    pub fn stop(self) -> bool {
        self.sender.send(()).is_ok()
    }

    /// 监听任务是否已经结束
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// 创建一对停止信号
pub fn stop_channel() -> (WatchStopper, StopSignal) {
    let (sender, receiver) = oneshot::channel();
    (WatchStopper { sender }, StopSignal { receiver })
}

/// 配置变更通知流
///
/// 通道无界: 配置中心回调线程发送时从不阻塞, 消费过慢时通知在内存中累积。
pub struct WatchStream {
    receiver: mpsc::UnboundedReceiver<RemoteResponse>,
    task: Option<JoinHandle<()>>,
    state: SessionState,
}

impl std::fmt::Debug for WatchStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchStream")
            .field("state", &self.state.get())
            .field("has_task", &self.task.is_some())
            .finish()
    }
}

impl WatchStream {
    /// 由通知接收端、监听任务和会话状态组成通知流
    pub fn new(
        receiver: mpsc::UnboundedReceiver<RemoteResponse>,
        task: Option<JoinHandle<()>>,
        state: SessionState,
    ) -> Self {
        Self {
            receiver,
            task,
            state,
        }
    }

    /// 接收下一条通知, 所有发送端关闭后返回 `None`
    pub async fn recv(&mut self) -> Option<RemoteResponse> {
        self.receiver.recv().await
    }

    /// 非阻塞地取出一条已到达的通知
    pub fn try_recv(&mut self) -> Option<RemoteResponse> {
        self.receiver.try_recv().ok()
    }

    /// 当前会话状态
    pub fn state(&self) -> WatchState {
        self.state.get()
    }

    /// 监听任务是否已经结束
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// 等待监听任务结束
    pub async fn join(&mut self) -> RemoteConfigResult<()> {
        if let Some(task) = self.task.take() {
            task.await.map_err(|e| RemoteConfigError::WatchTaskFailed {
                message: e.to_string(),
            })?;
        }
        Ok(())
    }
}

impl Stream for WatchStream {
    type Item = RemoteResponse;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}
