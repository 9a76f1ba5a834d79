pub use http::StatusCode;

pub trait HttpStatusCode {
    fn status_code(&self) -> Option<StatusCode>;

    fn is_status_code(&self, status_code: StatusCode) -> bool {
        self.status_code()
            .map(|some| some == status_code)
            .unwrap_or_default()
    }

    fn is_not_found(&self) -> bool {
        self.is_status_code(StatusCode::NOT_FOUND)
    }
}

impl HttpStatusCode for kube::Error {
    fn status_code(&self) -> Option<StatusCode> {
        if let kube::Error::Api(error_response) = self {
            StatusCode::from_u16(error_response.code).ok()
        } else {
            None
        }
    }
}

impl HttpStatusCode for reqwest::Error {
    fn status_code(&self) -> Option<StatusCode> {
        self.status()
    }
}

impl<T, E> HttpStatusCode for std::result::Result<T, E>
where
    E: HttpStatusCode,
{
    fn status_code(&self) -> Option<StatusCode> {
        self.as_ref().err().and_then(|e| e.status_code())
    }
}

/// Converts a `NOT_FOUND` error into `Ok(None)`. Any other error is passed through unchanged.
pub trait AllowNotFound<T, E> {
    /// `on_not_found` is called with the error before it is discarded.
    fn allow_not_found<F>(self, on_not_found: F) -> std::result::Result<Option<T>, E>
    where
        F: FnOnce(E);
}

impl<T, E> AllowNotFound<T, E> for std::result::Result<T, E>
where
    E: HttpStatusCode,
{
    fn allow_not_found<F>(self, on_not_found: F) -> std::result::Result<Option<T>, E>
    where
        F: FnOnce(E),
    {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => {
                on_not_found(e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[test]
fn allow_not_found_test() {
    #[derive(Debug)]
    struct Status(u16);
    impl HttpStatusCode for Status {
        fn status_code(&self) -> Option<StatusCode> {
            StatusCode::from_u16(self.0).ok()
        }
    }

    let found: std::result::Result<u8, Status> = Ok(1);
    assert_eq!(found.allow_not_found(|_| ()).unwrap(), Some(1));

    let missing: std::result::Result<u8, Status> = Err(Status(404));
    let mut seen = false;
    assert_eq!(missing.allow_not_found(|_| seen = true).unwrap(), None);
    assert!(seen);

    let broken: std::result::Result<u8, Status> = Err(Status(500));
    assert!(broken.allow_not_found(|_| ()).is_err());
}
