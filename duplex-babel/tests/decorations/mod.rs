mod captions;
