use lichess_model::{Game, TvChannels};

use super::ExportOptions;
use crate::client::LichessClient;
use crate::error::ClientResult;
use crate::transport::{Params, RequestSpec};
use crate::validate::ensure_range_opt;

impl LichessClient {
    /// The current game of every TV channel.
    pub async fn get_tv_games(&self) -> ClientResult<TvChannels> {
        let json = self.get_json(RequestSpec::get("/api/tv/channels")).await?;
        Ok(TvChannels::from_json(json)?)
    }

    /// Ongoing games of one channel, e.g. `blitz` or `kingOfTheHill`.
    pub async fn get_tv_channel_games(
        &self,
        channel: &str,
        number: Option<u32>,
        options: &ExportOptions,
    ) -> ClientResult<Vec<Game>> {
        let number = ensure_range_opt("number", number, 1, 30)?;
        let params = options.apply(Params::new().opt("nb", number));
        let request = RequestSpec::get(format!("/api/tv/{channel}")).params(params);
        self.ndjson_as(request, Game::from_json).await
    }
}
