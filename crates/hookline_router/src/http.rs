//! Transport seams.
//!
//! Dispatch needs exactly two things from the underlying HTTP stack: the
//! request's method name, and a way to write a status plus JSON body back.
//! Keeping the seams this narrow lets the router sit on top of any server
//! (or a plain test double) without a framework dependency.

/// Read side of the transport seam.
pub trait HttpRequest: Send {
    /// The request's HTTP method name, as received from the transport.
    /// Matching against the route table is case-insensitive.
    fn method(&self) -> &str;
}

/// Write side of the transport seam.
pub trait HttpResponse: Send {
    /// Sets the response status code.
    fn set_status(&mut self, status: u16);

    /// Writes a JSON body to the response.
    fn write_json(&mut self, body: serde_json::Value);
}
