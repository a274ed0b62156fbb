//! 事件扇出总线
//!
//! 主题名到订阅者发送端的注册表。每个订阅持有一条无界 mpsc 通道的
//! 接收端，可同时挂接多个主题；发布方遍历主题下的发送端逐一投递。
//!
//! 并发约束：注册表用 RwLock 保护，发布期间不跨 await 持锁。
//! 发布与并发进行中的订阅之间没有先后保证，订阅者可能看不到
//! 恰好竞态的那条消息（尽力投递语义）。

use crate::messages::EventMessage;
use coldwatch_telemetry::record_event_published;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

type TopicRegistry = HashMap<String, HashMap<u64, mpsc::UnboundedSender<EventMessage>>>;

struct BusInner {
    topics: RwLock<TopicRegistry>,
    next_id: AtomicU64,
}

/// 进程内事件总线（可克隆，内部共享）。
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl EventBus {
    /// 创建空总线。
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BusInner {
                topics: RwLock::new(HashMap::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// 向主题发布一条消息，返回实际投递的订阅者数量。
    ///
    /// 无人订阅的主题不存在注册表条目，发布即空操作。
    pub fn publish(&self, topic: &str, message: EventMessage) -> usize {
        record_event_published();
        let (delivered, dead) = {
            let topics = match self.inner.topics.read() {
                Ok(topics) => topics,
                Err(_) => return 0,
            };
            let Some(subscribers) = topics.get(topic) else {
                return 0;
            };
            let mut delivered = 0;
            let mut dead = Vec::new();
            for (id, tx) in subscribers {
                if tx.send(message.clone()).is_ok() {
                    delivered += 1;
                } else {
                    dead.push(*id);
                }
            }
            (delivered, dead)
        };
        // 接收端已消失的发送端顺手清理，避免注册表积累死引用
        if !dead.is_empty() {
            self.remove(topic, &dead);
        }
        delivered
    }

    /// 订阅一组主题，返回从此刻起的实时消息流。
    ///
    /// 没有回放：订阅之前发布的消息不可见。句柄 Drop 即退订。
    pub fn subscribe(&self, topics: &[&str]) -> EventSubscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        let topics: Vec<String> = topics.iter().map(|t| t.to_string()).collect();
        if let Ok(mut registry) = self.inner.topics.write() {
            for topic in &topics {
                registry
                    .entry(topic.clone())
                    .or_default()
                    .insert(id, tx.clone());
            }
        }
        EventSubscription {
            id,
            topics,
            rx,
            bus: self.clone(),
        }
    }

    /// 当前存在订阅者的主题数量（用于测试）。
    pub fn topic_count(&self) -> usize {
        self.inner.topics.read().map(|m| m.len()).unwrap_or(0)
    }

    /// 指定主题当前的订阅者数量（用于测试）。
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.inner
            .topics
            .read()
            .map(|m| m.get(topic).map(|subs| subs.len()).unwrap_or(0))
            .unwrap_or(0)
    }

    /// 从主题移除一组订阅者；清空后的主题条目一并回收。
    fn remove(&self, topic: &str, ids: &[u64]) {
        let Ok(mut registry) = self.inner.topics.write() else {
            return;
        };
        if let Some(subscribers) = registry.get_mut(topic) {
            for id in ids {
                subscribers.remove(id);
            }
            if subscribers.is_empty() {
                registry.remove(topic);
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// 一次订阅的消息流句柄。
///
/// 消息从订阅瞬间开始累积在无界通道里；流是无限的，只有 Drop
/// 会结束它。重新订阅得到的是全新的空流。
pub struct EventSubscription {
    id: u64,
    topics: Vec<String>,
    rx: mpsc::UnboundedReceiver<EventMessage>,
    bus: EventBus,
}

impl EventSubscription {
    /// 等待下一条消息。
    ///
    /// 总线持有发送端直到退订，因此存活期间不会返回 None。
    pub async fn recv(&mut self) -> Option<EventMessage> {
        self.rx.recv().await
    }

    /// 非阻塞取一条已到达的消息（用于测试）。
    pub fn try_recv(&mut self) -> Option<EventMessage> {
        self.rx.try_recv().ok()
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        for topic in std::mem::take(&mut self.topics) {
            self.bus.remove(&topic, &[self.id]);
        }
    }
}

impl futures::Stream for EventSubscription {
    type Item = EventMessage;

    fn poll_next(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
