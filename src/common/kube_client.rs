use crate::common::error::{
    CreateNamespace, GetNamespace, K8sClientGeneration, NamespaceAbsent, Result,
};
use k8s_openapi::api::core::v1::Namespace;
use kube::{
    api::{Api, PostParams},
    core::ObjectMeta,
    Client,
};
use snafu::{ensure, IntoError, ResultExt};
use tracing::{debug, info};

/// Generate a new kube::Client.
pub(crate) async fn client() -> Result<Client> {
    Client::try_default().await.context(K8sClientGeneration)
}

/// Generate the Namespace api client.
pub(crate) async fn namespaces_api() -> Result<Api<Namespace>> {
    Ok(Api::all(client().await?))
}

/// Make sure that the target Namespace exists. A Namespace which already exists is a
/// no-op. An absent Namespace is created only if `create_if_missing` is set.
pub(crate) async fn ensure_namespace(namespace: &str, create_if_missing: bool) -> Result<()> {
    let ns_api = namespaces_api().await?;

    match ns_api.get(namespace).await {
        Ok(_) => {
            debug!(%namespace, "Namespace already exists");
            Ok(())
        }
        Err(kube::Error::Api(response)) if response.code == 404 => {
            ensure!(create_if_missing, NamespaceAbsent { namespace });
            create_namespace(&ns_api, namespace).await
        }
        Err(error) => Err(GetNamespace {
            namespace: namespace.to_string(),
        }
        .into_error(error)),
    }
}

/// Create a Namespace, tolerating creation races against other clients.
async fn create_namespace(ns_api: &Api<Namespace>, namespace: &str) -> Result<()> {
    let ns = Namespace {
        metadata: ObjectMeta {
            name: Some(namespace.to_string()),
            ..Default::default()
        },
        ..Default::default()
    };

    match ns_api.create(&PostParams::default(), &ns).await {
        Ok(_) => {
            info!(%namespace, "Created Namespace");
            Ok(())
        }
        Err(kube::Error::Api(response)) if response.reason.eq("AlreadyExists") => {
            info!(%namespace, "Namespace already exists");
            Ok(())
        }
        Err(error) => Err(CreateNamespace {
            namespace: namespace.to_string(),
        }
        .into_error(error)),
    }
}
