use nsreg_common::PlayerId;

/// Errors from namespace and registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("namespace not found: {0}")]
    NamespaceNotFound(String),
    #[error("namespace already exists: {0}")]
    AlreadyExists(String),
    #[error("{member} is not a member of namespace {namespace}")]
    MemberNotFound { namespace: String, member: PlayerId },
    #[error("{member} is already a member of namespace {namespace}")]
    AlreadyMember { namespace: String, member: PlayerId },
    #[error("{sender} is not an admin of namespace {namespace}")]
    Unauthorized { namespace: String, sender: PlayerId },
    #[error("{member} owns namespace {namespace} and cannot be removed or demoted")]
    OwnerProtected { namespace: String, member: PlayerId },
    #[error("no free namespace name derived from {base:?} after {attempts} attempts")]
    NamespaceExhausted { base: String, attempts: usize },
    #[error("corrupt namespace {namespace}: {reason}")]
    CorruptNamespace {
        namespace: String,
        reason: &'static str,
    },
}
