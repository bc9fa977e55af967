mod callbacks;
pub mod error;
mod info;

use std::{
    fs,
    future::Future,
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use hook_proto::{info::info_server::InfoServer, v1alpha1, v1alpha2};
use log::{debug, info, warn};
use rand::Rng;
use tokio::net::UnixListener;

use crate::{
    config::{Config, HookVersion},
    rewrite::DomainHook,
};

use self::{callbacks::CallbacksService, error::Error, info::InfoService};

const SOCKET_NAME_ATTEMPTS: usize = 10;
const SOCKET_SUFFIX_LEN: usize = 4;
// no vowels, no look-alike characters
const SOCKET_SUFFIX_ALPHABET: &[u8] = b"bcdfghjklmnpqrstvwxz2456789";

fn random_suffix<R: Rng>(rng: &mut R) -> String {
    (0..SOCKET_SUFFIX_LEN)
        .map(|_| SOCKET_SUFFIX_ALPHABET[rng.gen_range(0..SOCKET_SUFFIX_ALPHABET.len())] as char)
        .collect()
}

fn pick_socket_path<F>(dir: &Path, name: &str, mut suffix: F) -> Result<PathBuf, Error>
where
    F: FnMut() -> String,
{
    fs::metadata(dir).map_err(|e| Error::HooksDirUnavailable(dir.into(), e))?;

    // Several hooks may share the directory, so retry on collisions.
    for _ in 0..SOCKET_NAME_ATTEMPTS {
        let path = dir.join(format!("{}-{}.sock", name, suffix()));
        match fs::symlink_metadata(&path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(path),
            Ok(_) => info!("socket {} already exists", path.display()),
            Err(e) => info!("failed socket {}: {}", path.display(), e),
        }
    }

    Err(Error::SocketNamesExhausted(
        dir.into(),
        SOCKET_NAME_ATTEMPTS,
    ))
}

/// Picks an unused `<name>-XXXX.sock` path in the hook sockets directory.
pub fn socket_path(dir: &Path, name: &str) -> Result<PathBuf, Error> {
    let mut rng = rand::thread_rng();
    pick_socket_path(dir, name, || random_suffix(&mut rng))
}

/// Removes the socket file when dropped.
struct SocketFile(PathBuf);

impl Drop for SocketFile {
    fn drop(&mut self) {
        match fs::remove_file(&self.0) {
            Ok(()) => debug!("removed socket {}", self.0.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("failed to remove socket {}: {}", self.0.display(), e),
        }
    }
}

/// Serves the info service and the negotiated callbacks service on a unix
/// socket at `socket_path` until `shutdown` resolves. The socket file is
/// removed on return.
pub async fn run_server<F>(
    config: Arc<Config>,
    hook: Arc<DomainHook>,
    socket_path: PathBuf,
    shutdown: F,
) -> Result<(), Error>
where
    F: Future<Output = ()>,
{
    let uds = UnixListener::bind(&socket_path).map_err(|e| Error::Bind(socket_path.clone(), e))?;
    let _socket = SocketFile(socket_path.clone());

    let uds_stream = futures::stream::try_unfold(uds, move |uds| async move {
        let (conn, addr) = uds.accept().await?;
        debug!("accepted new unix socket connection: {:?}", addr);
        Ok::<_, io::Error>(Some((conn, uds)))
    });

    let callbacks = CallbacksService::new(hook);
    let (v1alpha1_service, v1alpha2_service) = match config.version {
        HookVersion::V1Alpha1 => (
            Some(v1alpha1::callbacks_server::CallbacksServer::new(callbacks)),
            None,
        ),
        HookVersion::V1Alpha2 => (
            None,
            Some(v1alpha2::callbacks_server::CallbacksServer::new(callbacks)),
        ),
    };

    info!(
        "{} is now exposing its services on socket {}",
        config.name,
        socket_path.display()
    );

    tonic::transport::Server::builder()
        .add_service(InfoServer::new(InfoService::new(config.clone())))
        .add_optional_service(v1alpha1_service)
        .add_optional_service(v1alpha2_service)
        .serve_with_incoming_shutdown(uds_stream, shutdown)
        .await?;

    info!("{} stopped serving", config.name);

    Ok(())
}

#[cfg(test)]
mod test {
    use std::{fs, sync::Arc, time::Duration};

    use super::{error::Error, pick_socket_path, run_server, socket_path, SocketFile};
    use crate::{config::Config, namescheme::HashedNameScheme, rewrite::DomainHook};

    #[test]
    fn socket_path_in_hooks_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = socket_path(dir.path(), "shim").unwrap();

        assert_eq!(path.parent(), Some(dir.path()));
        let file_name = path.file_name().unwrap().to_str().unwrap();
        assert!(file_name.starts_with("shim-"), "{file_name}");
        assert!(file_name.ends_with(".sock"), "{file_name}");
        let suffix = &file_name["shim-".len()..file_name.len() - ".sock".len()];
        assert_eq!(suffix.len(), 4);
        assert!(suffix
            .bytes()
            .all(|b| super::SOCKET_SUFFIX_ALPHABET.contains(&b)));
        assert!(!path.exists());
    }

    #[test]
    fn socket_path_requires_hooks_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(matches!(
            socket_path(&missing, "shim"),
            Err(Error::HooksDirUnavailable(path, _)) if path == missing
        ));
    }

    #[test]
    fn socket_path_retries_taken_names() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("shim-aaaa.sock"), "").unwrap();
        fs::write(dir.path().join("shim-bbbb.sock"), "").unwrap();

        let mut suffixes = vec!["cccc", "bbbb", "aaaa"];
        let path = pick_socket_path(dir.path(), "shim", || suffixes.pop().unwrap().into()).unwrap();
        assert_eq!(path, dir.path().join("shim-cccc.sock"));
    }

    #[test]
    fn socket_path_gives_up() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("shim-aaaa.sock"), "").unwrap();

        let mut attempts = 0;
        let result = pick_socket_path(dir.path(), "shim", || {
            attempts += 1;
            "aaaa".into()
        });
        assert!(matches!(result, Err(Error::SocketNamesExhausted(_, 10))));
        assert_eq!(attempts, 10);
    }

    #[test]
    fn socket_file_is_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shim-test.sock");
        fs::write(&path, "").unwrap();

        drop(SocketFile(path.clone()));
        assert!(!path.exists());

        // already gone is fine
        drop(SocketFile(path.clone()));
    }

    #[tokio::test]
    async fn serves_until_shutdown_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shim-test.sock");

        let config = Arc::new(Config::new(Some("v1alpha2"), dir.path().into()).unwrap());
        let hook = Arc::new(DomainHook::new(config.clone(), Box::new(HashedNameScheme)));
        let (shutdown_send, shutdown_recv) = tokio::sync::oneshot::channel::<()>();

        let server = tokio::spawn(run_server(config, hook, path.clone(), async move {
            let _ = shutdown_recv.await;
        }));

        for _ in 0..100 {
            if path.exists() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(path.exists());

        let conn = tokio::net::UnixStream::connect(&path).await.unwrap();
        drop(conn);

        shutdown_send.send(()).unwrap();
        server.await.unwrap().unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn bind_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("shim-test.sock");

        let config = Arc::new(Config::new(Some("v1alpha1"), dir.path().into()).unwrap());
        let hook = Arc::new(DomainHook::new(config.clone(), Box::new(HashedNameScheme)));

        let result = run_server(config, hook, path.clone(), async {}).await;
        assert!(matches!(result, Err(Error::Bind(p, _)) if p == path));
    }
}
