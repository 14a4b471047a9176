/*!
    Filter graph stage for decoded video frames.

    A [`FilterGraph`] wraps an FFmpeg filter graph laid out as

    ```text
    buffer "in" -> <chain> -> format=<pixel format> -> buffersink "out"
    ```

    where the chain is any FFmpeg filter description (`scale=320:240`,
    `fps=5`, `hflip,crop=100:100`, ...). The output pixel format is always
    forced to the configured one.

    # Example

    ```ignore
    use vidtensor_filter::{BufferSource, FilterConfig, FilterGraph};

    let config = FilterConfig::new("rgb24").with_chain("scale=224:224");
    let mut graph = FilterGraph::new(&BufferSource::of(&source), &config)?;

    graph.push(source.current())?;
    while graph.pull()? {
        let frame = graph.current();
        // One input may produce zero, one or many outputs
    }
    ```

    # Push / Pull

    Pulling never blocks. When it reports no frame the graph wants more
    input, which is normal for filters that drop or merge frames.
*/

pub use vidtensor_types::{Error, Rational, Result};

mod config;
mod graph;

pub use config::{DEFAULT_CHAIN, FilterConfig};
pub use graph::{BufferSource, FilterGraph};
