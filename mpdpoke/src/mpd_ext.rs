use mpdpoke_mpd::{
    client::Client,
    errors::{ErrorCode, MpdError, MpdFailureResponse},
    mpd_client::MpdClient,
};

pub trait MpdExt {
    fn find_album_art(&mut self, path: &str) -> Result<Option<Vec<u8>>, MpdError>;
}

impl MpdExt for Client<'_> {
    /// Embedded art first, then a cover file next to the track. A missing
    /// picture is `None`, not an error.
    fn find_album_art(&mut self, path: &str) -> Result<Option<Vec<u8>>, MpdError> {
        match self.read_picture(path) {
            Ok(Some(art)) => Ok(Some(art)),
            Ok(None) | Err(MpdError::Mpd(MpdFailureResponse { code: ErrorCode::NoExist, .. })) => {
                match self.albumart(path) {
                    Ok(art @ Some(_)) => Ok(art),
                    Ok(None)
                    | Err(MpdError::Mpd(MpdFailureResponse {
                        code: ErrorCode::NoExist, ..
                    })) => {
                        tracing::debug!(path, "No album art found");
                        Ok(None)
                    }
                    Err(err) => Err(err),
                }
            }
            Err(err) => Err(err),
        }
    }
}
