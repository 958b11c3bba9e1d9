use crate::api::{ApiError, CatalogApi, MoviePoster, MoviesPage};
use crate::controller::{MoviesRequest, PostersRequest};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Completions delivered back to the UI loop.
#[derive(Debug)]
pub enum FetchEvent {
    Movies {
        generation: u64,
        result: Result<MoviesPage, ApiError>,
    },
    Posters {
        generation: u64,
        result: Result<Vec<MoviePoster>, ApiError>,
    },
    Genres(Result<Vec<String>, ApiError>),
}

/// Runs controller requests on the tokio runtime.
///
/// Starting a primary fetch aborts the previous cycle's tasks; the controller's
/// generation check still rejects anything that completes before the abort lands.
pub struct Dispatcher<A: CatalogApi> {
    api: Arc<A>,
    tx: UnboundedSender<FetchEvent>,
    movies_task: Option<JoinHandle<()>>,
    posters_task: Option<JoinHandle<()>>,
}

impl<A: CatalogApi> Dispatcher<A> {
    pub fn new(api: Arc<A>) -> (Self, UnboundedReceiver<FetchEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = Self {
            api,
            tx,
            movies_task: None,
            posters_task: None,
        };
        (dispatcher, rx)
    }

    pub fn fetch_movies(&mut self, request: MoviesRequest) {
        for task in [self.movies_task.take(), self.posters_task.take()].into_iter().flatten() {
            task.abort();
        }

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.movies_task = Some(tokio::spawn(async move {
            let result = api.list_movies(&request.query).await;
            let _ = tx.send(FetchEvent::Movies {
                generation: request.generation,
                result,
            });
        }));
    }

    pub fn fetch_posters(&mut self, request: PostersRequest) {
        if let Some(task) = self.posters_task.take() {
            task.abort();
        }

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.posters_task = Some(tokio::spawn(async move {
            let result = api.list_posters(&request.ids).await;
            let _ = tx.send(FetchEvent::Posters {
                generation: request.generation,
                result,
            });
        }));
    }

    pub fn fetch_genres(&self) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(FetchEvent::Genres(api.list_genres().await));
        });
    }
}


#[cfg(test)]
mod tests {
    use super::fake::FakeCatalog;
    use super::*;
    use crate::controller::PageController;

    #[tokio::test]
    async fn delivers_movies_then_posters() {
        let api = Arc::new(FakeCatalog::with_count(40, 4));
        let (mut dispatcher, mut rx) = Dispatcher::new(Arc::clone(&api));
        let mut controller = PageController::new();

        dispatcher.fetch_movies(controller.start());
        let Some(FetchEvent::Movies { generation, result }) = rx.recv().await else {
            panic!("expected movies event");
        };
        let posters = controller.apply_movies(generation, result).expect("poster pass");
        assert_eq!(posters.ids, vec!["p0-0".to_string(), "p0-2".to_string()]);

        dispatcher.fetch_posters(posters);
        let Some(FetchEvent::Posters { generation, result }) = rx.recv().await else {
            panic!("expected posters event");
        };
        controller.apply_posters(generation, result);

        assert!(controller.movies().iter().all(|m| m.has_poster()));
        assert_eq!(controller.total_pages(), 3);
    }

    #[tokio::test]
    async fn genres_are_reported() {
        let api = Arc::new(FakeCatalog::default());
        let (dispatcher, mut rx) = Dispatcher::new(api);
        dispatcher.fetch_genres();
        match rx.recv().await {
            Some(FetchEvent::Genres(Ok(genres))) => assert_eq!(genres.len(), 3),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
