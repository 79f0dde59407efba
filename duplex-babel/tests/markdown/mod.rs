mod export;
mod import;
mod props;
mod round_trip;
