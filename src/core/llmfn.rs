use std::path::PathBuf;
use std::sync::Arc;

use crate::core::completion::Completion;
use crate::core::generated::GeneratedFn;
use crate::core::prompt::{build_prompt, Instruction};
use crate::core::runtime::ScriptRuntime;
use crate::core::signature::Signature;
use crate::core::store::ArtifactStore;
use crate::core::validation::{JsonSchemaCompiler, SchemaCompiler};
use crate::error::{Error, Result};

/// Produces [`LlmFn`]s sharing one completion backend, runtime, validator and store.
#[derive(Clone)]
pub struct Factory {
    completion: Arc<dyn Completion>,
    runtime: Arc<dyn ScriptRuntime>,
    compiler: Arc<dyn SchemaCompiler>,
    store: ArtifactStore,
}

impl Factory {
    pub fn builder() -> FactoryBuilder {
        FactoryBuilder::new()
    }

    /// HTTP client for `configuration`, the Rhai runtime, `jsonschema` validation
    /// and artifacts under `./generated`.
    #[cfg(all(feature = "llm", feature = "rhai"))]
    pub fn new(configuration: crate::llm::Configuration) -> Self {
        Self {
            completion: Arc::new(crate::llm::Client::new(configuration)),
            runtime: Arc::new(crate::core::rhai_runtime::RhaiRuntime::new()),
            compiler: Arc::new(JsonSchemaCompiler),
            store: ArtifactStore::default(),
        }
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Bind a signature. The returned value generates or loads the function on
    /// [`instruct`](LlmFn::instruct).
    pub fn llmfn(&self, signature: Signature) -> LlmFn {
        LlmFn {
            factory: self.clone(),
            signature,
        }
    }
}

/// Builder for [`Factory`].
///
/// Without a completion backend or runtime, `build` falls back to
/// [`Client::default`](crate::llm::Client) and [`RhaiRuntime`](crate::RhaiRuntime)
/// when those features are enabled, and fails otherwise.
#[derive(Default)]
pub struct FactoryBuilder {
    completion: Option<Arc<dyn Completion>>,
    runtime: Option<Arc<dyn ScriptRuntime>>,
    compiler: Option<Arc<dyn SchemaCompiler>>,
    store: Option<ArtifactStore>,
}

impl FactoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn completion(mut self, completion: impl Completion + 'static) -> Self {
        self.completion = Some(Arc::new(completion));
        self
    }

    pub fn runtime(mut self, runtime: impl ScriptRuntime + 'static) -> Self {
        self.runtime = Some(Arc::new(runtime));
        self
    }

    /// Defaults to [`JsonSchemaCompiler`].
    pub fn compiler(mut self, compiler: impl SchemaCompiler + 'static) -> Self {
        self.compiler = Some(Arc::new(compiler));
        self
    }

    /// Defaults to `./generated`.
    pub fn store(mut self, store: ArtifactStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self) -> Result<Factory> {
        let completion: Arc<dyn Completion> = match self.completion {
            Some(completion) => completion,
            #[cfg(feature = "llm")]
            None => Arc::new(crate::llm::Client::default()),
            #[cfg(not(feature = "llm"))]
            None => return Err(Error::Completion("no completion backend configured".to_string())),
        };
        let runtime: Arc<dyn ScriptRuntime> = match self.runtime {
            Some(runtime) => runtime,
            #[cfg(feature = "rhai")]
            None => Arc::new(crate::core::rhai_runtime::RhaiRuntime::new()),
            #[cfg(not(feature = "rhai"))]
            None => return Err(Error::Load("no script runtime configured".to_string())),
        };

        let compiler: Arc<dyn SchemaCompiler> = match self.compiler {
            Some(compiler) => compiler,
            None => Arc::new(JsonSchemaCompiler),
        };

        Ok(Factory {
            completion,
            runtime,
            compiler,
            store: self.store.unwrap_or_default(),
        })
    }
}

/// A signature bound to a [`Factory`].
#[derive(Clone)]
pub struct LlmFn {
    factory: Factory,
    signature: Signature,
}

impl LlmFn {
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Where the artifact for this signature's identifier lives.
    pub fn artifact_path(&self) -> Result<PathBuf> {
        self.factory
            .store
            .path_for(&self.signature.id, self.factory.runtime.extension())
    }

    /// Return the validating callable for this signature.
    ///
    /// If the artifact already exists it is loaded as is and `instruction` is
    /// ignored. Otherwise the model is asked once, and its reply is persisted
    /// verbatim before being loaded.
    pub async fn instruct(&self, instruction: impl Into<Instruction>) -> Result<GeneratedFn> {
        let path = self.artifact_path()?;
        let store = &self.factory.store;

        if store.exists(&path).await {
            log::debug!("Cache hit for '{}' at {}", self.signature.id, path.display());
        } else {
            log::debug!("Cache miss for '{}' at {}", self.signature.id, path.display());
            let prompt = build_prompt(
                self.factory.runtime.export_directive(),
                &instruction.into(),
                &self.signature.inputs,
                &self.signature.output,
            );

            log::info!(
                "Generating {} code for '{}'",
                self.factory.runtime.language(),
                self.signature.id
            );
            let code = self.factory.completion.generate(&prompt).await?;
            store.persist(&path, &code).await?;
        }

        let source = store.read(&path).await?;
        let implementation = self.factory.runtime.load(&source).map_err(|e| match e {
            Error::Load(msg) => Error::Load(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;

        GeneratedFn::new(
            self.signature.clone(),
            implementation,
            self.factory.compiler.as_ref(),
        )
    }
}
