//! Callback-style transport (JSONP)
//!
//! Each call binds a uniquely named callback, injects a script whose URL
//! carries `callback=<name>` and waits for the script to invoke it. The
//! binding and the injected script are guards: whichever way the call ends
//! (callback fired, load error, timeout, caller dropped the future) both are
//! removed again.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use rand::Rng;
use reqwest::Url;
use serde_json::Value;
use tokio::sync::oneshot;
use tokio::task::{AbortHandle, JoinHandle};

use shared::util::{now_millis, to_base36};

use super::script::{HttpScriptLoader, ScriptInvocation, ScriptLoader};
use super::Transport;
use crate::{ClientError, ClientResult};

/// `cb_<unix millis>_<5 base-36 chars>`
pub fn callback_name() -> String {
    let suffix = rand::thread_rng().gen_range(36u64.pow(4)..36u64.pow(5));
    format!("cb_{}_{}", now_millis(), to_base36(suffix))
}

/// Table of callbacks a script may invoke by name
#[derive(Debug, Clone, Default)]
pub struct CallbackRegistry {
    bindings: Arc<DashMap<String, oneshot::Sender<Value>>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn bind(&self, name: &str) -> (CallbackBinding, oneshot::Receiver<Value>) {
        let (tx, rx) = oneshot::channel();
        self.bindings.insert(name.to_string(), tx);
        let binding = CallbackBinding {
            registry: self.clone(),
            name: name.to_string(),
        };
        (binding, rx)
    }

    /// Invoke the callback bound under `name`. Returns false when nothing is
    /// bound (already fired, timed out, or never registered).
    pub fn invoke(&self, name: &str, payload: Value) -> bool {
        match self.bindings.remove(name) {
            Some((_, tx)) => tx.send(payload).is_ok(),
            None => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

struct CallbackBinding {
    registry: CallbackRegistry,
    name: String,
}

impl Drop for CallbackBinding {
    fn drop(&mut self) {
        self.registry.bindings.remove(&self.name);
    }
}

/// Scripts currently attached, keyed by callback name
#[derive(Debug, Clone, Default)]
struct ScriptHead {
    scripts: Arc<DashMap<String, AbortHandle>>,
}

impl ScriptHead {
    fn inject(&self, name: &str, handle: AbortHandle) -> InjectedScript {
        self.scripts.insert(name.to_string(), handle);
        InjectedScript {
            head: self.clone(),
            name: name.to_string(),
        }
    }
}

struct InjectedScript {
    head: ScriptHead,
    name: String,
}

impl Drop for InjectedScript {
    fn drop(&mut self) {
        if let Some((_, handle)) = self.head.scripts.remove(&self.name) {
            handle.abort();
        }
    }
}

/// JSONP transport
#[derive(Debug, Clone)]
pub struct CallbackTransport {
    loader: Arc<dyn ScriptLoader>,
    registry: CallbackRegistry,
    head: ScriptHead,
    timeout: Duration,
}

impl CallbackTransport {
    pub fn new(loader: Arc<dyn ScriptLoader>, timeout: Duration) -> Self {
        Self {
            loader,
            registry: CallbackRegistry::new(),
            head: ScriptHead::default(),
            timeout,
        }
    }

    /// Transport loading scripts over HTTP
    pub fn http(timeout: Duration) -> ClientResult<Self> {
        let loader = HttpScriptLoader::new(timeout)?;
        Ok(Self::new(Arc::new(loader), timeout))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn registry(&self) -> &CallbackRegistry {
        &self.registry
    }

    /// Callback bindings still registered
    pub fn pending_callbacks(&self) -> usize {
        self.registry.len()
    }

    /// Scripts still attached
    pub fn injected_scripts(&self) -> usize {
        self.head.scripts.len()
    }

    fn script_src(url: &Url, callback: &str) -> Url {
        let mut src = url.clone();
        src.query_pairs_mut().append_pair("callback", callback);
        src
    }
}

async fn settle(
    rx: &mut oneshot::Receiver<Value>,
    script: &mut JoinHandle<ClientResult<()>>,
) -> ClientResult<Value> {
    let loaded = tokio::select! {
        biased;
        fired = &mut *rx => {
            return fired.map_err(|_| ClientError::ScriptLoad("callback binding dropped".into()));
        }
        loaded = &mut *script => loaded,
    };

    match loaded {
        Ok(Ok(())) => rx.try_recv().map_err(|_| {
            ClientError::ScriptLoad("script did not invoke the callback".into())
        }),
        Ok(Err(e)) => Err(e),
        Err(e) => Err(ClientError::ScriptLoad(e.to_string())),
    }
}

#[async_trait]
impl Transport for CallbackTransport {
    fn name(&self) -> &'static str {
        "callback"
    }

    async fn call(&self, url: &Url) -> ClientResult<Value> {
        let name = callback_name();
        let (_binding, mut rx) = self.registry.bind(&name);
        let src = Self::script_src(url, &name);

        let loader = self.loader.clone();
        let registry = self.registry.clone();
        let mut script = tokio::spawn(async move {
            let body = loader.load(&src).await?;
            let invocation = ScriptInvocation::parse(&body)?;
            if !registry.invoke(&invocation.callback, invocation.payload) {
                tracing::warn!(
                    callback = %invocation.callback,
                    "Script invoked an unbound callback"
                );
            }
            Ok::<(), ClientError>(())
        });
        let _injected = self.head.inject(&name, script.abort_handle());

        match tokio::time::timeout(self.timeout, settle(&mut rx, &mut script)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(callback = %name, timeout = ?self.timeout, "Callback timed out");
                Err(ClientError::CallbackTimeout(self.timeout))
            }
        }
    }
}
