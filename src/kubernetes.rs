use crate::error::{AssertError, Result};
use crate::types::{LogText, PodEvent, PodTarget};
use crate::utils::selector_to_labels_string;
use crate::watch::EventSubscription;
use futures::io::{AsyncRead, AsyncReadExt};
use futures::stream::StreamExt;
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::{Event as CoreEvent, Pod};
use kube::runtime::watcher::{Config as WatcherConfig, Event, watcher};
use kube::{
    Api, Client,
    api::{ListParams, LogParams},
    config,
};
use std::future::Future;
use tracing::{debug, info};

/// The slice of the Kubernetes API the evaluators depend on.
pub trait ClusterApi: Sync {
    fn list_pods(
        &self,
        namespace: &str,
        label_selector: Option<&str>,
    ) -> impl Future<Output = Result<Vec<Pod>>> + Send;

    /// Full log text accumulated so far for one pod/container.
    fn pod_log(&self, target: &PodTarget) -> impl Future<Output = Result<LogText>> + Send;

    fn watch_events(
        &self,
        namespace: &str,
        field_selector: Option<&str>,
    ) -> impl Future<Output = Result<EventSubscription>> + Send;

    fn list_job_pods(
        &self,
        namespace: &str,
        job_name: &str,
    ) -> impl Future<Output = Result<Vec<Pod>>> + Send;
}

/// [`ClusterApi`] backed by a live cluster.
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
}

impl KubeCluster {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connect using the given kubeconfig context, or the current one.
    pub async fn connect(context: Option<&str>) -> anyhow::Result<Self> {
        let config = match context {
            Some(ctx) => config::Config::from_kubeconfig(&config::KubeConfigOptions {
                context: Some(ctx.to_string()),
                ..Default::default()
            })
            .await
            .map_err(|e| anyhow::anyhow!("Context '{}' not found in kubeconfig: {}", ctx, e))?,
            None => config::Config::infer().await?,
        };
        let client = Client::try_from(config)?;
        info!("Connected to cluster (context: {})", context.unwrap_or("current"));
        Ok(Self::new(client))
    }
}

impl ClusterApi for KubeCluster {
    async fn list_pods(&self, namespace: &str, label_selector: Option<&str>) -> Result<Vec<Pod>> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let mut lp = ListParams::default();
        if let Some(sel) = label_selector {
            lp = lp.labels(sel);
        }
        let pods = api
            .list(&lp)
            .await
            .map_err(|e| AssertError::List(format!("pods in {}: {}", namespace, e)))?;
        Ok(pods.items)
    }

    async fn pod_log(&self, target: &PodTarget) -> Result<LogText> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), &target.namespace);
        let lp = LogParams {
            container: target.container.clone(),
            ..Default::default()
        };
        debug!("Fetching logs for pod {}", target);
        let reader = api
            .log_stream(&target.name, &lp)
            .await
            .map_err(|e| AssertError::Fetch {
                pod: target.to_string(),
                reason: e.to_string(),
            })?;
        drain_log(target, reader).await
    }

    async fn watch_events(
        &self,
        namespace: &str,
        field_selector: Option<&str>,
    ) -> Result<EventSubscription> {
        let api: Api<CoreEvent> = Api::namespaced(self.client.clone(), namespace);
        let mut cfg = WatcherConfig::default();
        if let Some(fields) = field_selector {
            cfg = cfg.fields(fields);
        }
        debug!(
            "Starting event watcher in namespace {} (fields: {})",
            namespace,
            field_selector.unwrap_or("<none>")
        );
        let stream = watcher(api, cfg)
            .filter_map(|event| async move {
                match event {
                    Ok(Event::Apply(ev)) | Ok(Event::InitApply(ev)) => Some(Ok(PodEvent::from(ev))),
                    Ok(_) => None,
                    Err(e) => Some(Err(AssertError::Watch(e.to_string()))),
                }
            })
            .boxed();
        let ns = namespace.to_string();
        Ok(EventSubscription::new(stream)
            .on_stop(move || debug!("Event watcher in namespace {} stopped", ns)))
    }

    async fn list_job_pods(&self, namespace: &str, job_name: &str) -> Result<Vec<Pod>> {
        let jobs: Api<Job> = Api::namespaced(self.client.clone(), namespace);
        let selector = match jobs.get_opt(job_name).await {
            Ok(job) => job
                .and_then(|j| j.spec)
                .and_then(|s| s.selector)
                .and_then(|sel| selector_to_labels_string(&sel)),
            Err(e) => return Err(AssertError::List(format!("job {}: {}", job_name, e))),
        };
        let selector = selector.unwrap_or_else(|| job_pod_selector(job_name));
        self.list_pods(namespace, Some(&selector)).await
    }
}

/// Label selector matching the pods created for a job.
pub fn job_pod_selector(job_name: &str) -> String {
    format!("job-name={}", job_name)
}

/// Field selector matching events about one object.
pub fn involved_object_selector(name: &str) -> String {
    format!("involvedObject.name={}", name)
}

/// Read a log stream to the end. The reader is dropped on every return path.
pub async fn drain_log<R: AsyncRead>(target: &PodTarget, reader: R) -> Result<LogText> {
    let mut reader = std::pin::pin!(reader);
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .await
        .map_err(|e| AssertError::Fetch {
            pod: target.to_string(),
            reason: e.to_string(),
        })?;
    Ok(LogText::from(String::from_utf8_lossy(&buf).as_ref()))
}
