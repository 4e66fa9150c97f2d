// Create the Error, ErrorKind, ResultExt, and Result types.
// Other modules `use crate::errors::*;` to get access to everything `error_chain!` creates.
// Nothing retries internally. Callers wanting a different outcome reseed and call again.
use crate::cells::Coordinate;

error_chain! {

    foreign_links {
        Io(::std::io::Error);
    }

    errors {
        InvalidConfiguration(reason: String) {
            description("invalid maze configuration")
            display("invalid maze configuration: {}", reason)
        }

        // Wall removal between cells that are not grid-adjacent, or not on the grid at all.
        InvalidEdge(a: Coordinate, b: Coordinate) {
            description("invalid edge")
            display("cells {} and {} do not share a wall on this grid", a, b)
        }

        MalformedEncoding(reason: String) {
            description("malformed maze encoding")
            display("malformed maze encoding: {}", reason)
        }

        // The exit cannot be reached from the entry through open passages.
        NoPath(entry: Coordinate, exit: Coordinate) {
            description("no path between entry and exit")
            display("no path from {} to {}", entry, exit)
        }

        GenerationTimeout(steps: usize) {
            description("maze generation exceeded its step limit")
            display("maze generation gave up after {} random walk steps", steps)
        }
    }
}
